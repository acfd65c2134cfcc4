//! The location record: every scalar form field, typed and validated.
//!
//! [`RecordInput`] is the mutable form state (and the YAML shape). Capturing
//! it with [`RecordInput::capture`] validates it and yields an immutable
//! [`LocationRecord`], whose [`LocationRecord::fields`] is the single ordered
//! `(label, value)` list both exporters render.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::common::{format_float, format_int};
use crate::error::{Error, Result};
use crate::location::taxonomy;
use crate::ooxml::xlsx::CellValue;

/// Names of the detail options, in form order.
pub const DETAIL_OPTION_NAMES: [&str; 9] = [
    "ゼネ車使用可否",
    "キッチン使用可否",
    "同録の可否",
    "養生の有無",
    "電源の有無",
    "駐車場の有無",
    "特機の使用可否",
    "スモークの使用可否",
    "火器の使用可否",
];

/// Availability answer for a detail option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "あり")]
    Yes,
    #[serde(rename = "なし")]
    No,
    #[default]
    #[serde(rename = "不明")]
    Unknown,
}

impl Availability {
    pub fn label(self) -> &'static str {
        match self {
            Availability::Yes => "あり",
            Availability::No => "なし",
            Availability::Unknown => "不明",
        }
    }
}

/// Payment method choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "現金")]
    Cash,
    #[serde(rename = "カード")]
    Card,
    #[serde(rename = "請求書")]
    Invoice,
    #[default]
    #[serde(rename = "不明")]
    Unknown,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "現金",
            PaymentMethod::Card => "カード",
            PaymentMethod::Invoice => "請求書",
            PaymentMethod::Unknown => "不明",
        }
    }
}

/// Detail option name -> availability, one entry per name in
/// [`DETAIL_OPTION_NAMES`]. Unset options are [`Availability::Unknown`].
///
/// In YAML this is a mapping keyed by option name; unknown names are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Availability>",
    into = "BTreeMap<String, Availability>"
)]
pub struct DetailOptions {
    values: [Availability; DETAIL_OPTION_NAMES.len()],
}

impl DetailOptions {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(name: &str) -> Option<usize> {
        DETAIL_OPTION_NAMES.iter().position(|n| *n == name)
    }

    /// Availability of the named option, `None` for an unknown name.
    pub fn get(&self, name: &str) -> Option<Availability> {
        Self::index_of(name).map(|i| self.values[i])
    }

    /// Set the named option.
    pub fn set(&mut self, name: &str, value: Availability) -> Result<()> {
        let index = Self::index_of(name)
            .ok_or_else(|| Error::InvalidRecord(format!("unknown detail option '{}'", name)))?;
        self.values[index] = value;
        Ok(())
    }

    /// `(name, availability)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Availability)> + '_ {
        DETAIL_OPTION_NAMES.iter().copied().zip(self.values)
    }
}

impl TryFrom<BTreeMap<String, Availability>> for DetailOptions {
    type Error = Error;

    fn try_from(map: BTreeMap<String, Availability>) -> Result<Self> {
        let mut options = DetailOptions::new();
        for (name, value) in map {
            options.set(&name, value)?;
        }
        Ok(options)
    }
}

impl From<DetailOptions> for BTreeMap<String, Availability> {
    fn from(options: DetailOptions) -> Self {
        options
            .iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

/// One exported value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    Empty,
}

impl FieldValue {
    /// Text shown for this value, identical in the sheet and on slides.
    ///
    /// Booleans print as `TRUE`/`FALSE`, the way spreadsheet applications
    /// display boolean cells.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format_float(*n),
            FieldValue::Integer(i) => format_int(*i),
            FieldValue::Bool(true) => "TRUE".to_string(),
            FieldValue::Bool(false) => "FALSE".to_string(),
            FieldValue::Empty => String::new(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<&FieldValue> for CellValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => CellValue::String(s.clone()),
            FieldValue::Number(n) => CellValue::Float(*n),
            FieldValue::Integer(i) => CellValue::Int(*i),
            FieldValue::Bool(b) => CellValue::Bool(*b),
            FieldValue::Empty => CellValue::Empty,
        }
    }
}

/// `HH:MM` (de)serialization for times of day.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(text.trim(), FORMAT).map_err(de::Error::custom)
    }
}

fn default_main_kind() -> String {
    "ハウススタジオ".to_string()
}

fn default_sub_kind() -> String {
    "和風".to_string()
}

fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

fn default_end_time() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default()
}

/// Form state before capture. Every field has the form's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordInput {
    pub name: String,
    pub address: String,
    pub homepage: String,
    pub main_kind: String,
    pub sub_kind: String,
    pub transport: String,
    /// 面積 in m²
    pub area_m2: f64,
    /// 天高 in cm
    pub ceiling_cm: f64,
    pub contact_name: String,
    pub phone: String,
    pub email: String,
    /// Yen per day
    pub price_per_day: i64,
    /// Yen per hour
    pub price_per_hour: i64,
    pub price_note: String,
    pub open_24h: bool,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub details: DetailOptions,
    pub headcount_specified: bool,
    /// Only meaningful when `headcount_specified` is set.
    pub max_headcount: Option<i64>,
    pub unlimited_headcount: bool,
    pub unknown_headcount: bool,
    pub payment: PaymentMethod,
    pub payment_note: String,
    pub work_number: String,
    pub pm_person: String,
    pub p_person: String,
    pub coordinator: String,
}

impl Default for RecordInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            homepage: String::new(),
            main_kind: default_main_kind(),
            sub_kind: default_sub_kind(),
            transport: String::new(),
            area_m2: 0.0,
            ceiling_cm: 0.0,
            contact_name: String::new(),
            phone: String::new(),
            email: String::new(),
            price_per_day: 0,
            price_per_hour: 0,
            price_note: String::new(),
            open_24h: false,
            start_time: default_start_time(),
            end_time: default_end_time(),
            details: DetailOptions::default(),
            headcount_specified: false,
            max_headcount: None,
            unlimited_headcount: false,
            unknown_headcount: false,
            payment: PaymentMethod::default(),
            payment_note: String::new(),
            work_number: String::new(),
            pm_person: String::new(),
            p_person: String::new(),
            coordinator: String::new(),
        }
    }
}

impl RecordInput {
    /// Validate the form state and freeze it into a [`LocationRecord`].
    pub fn capture(self) -> Result<LocationRecord> {
        LocationRecord::try_from(self)
    }

    /// Parse form state from YAML. Missing keys take their defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_saphyr::from_str(text).map_err(|e| Error::Yaml(e.to_string()))
    }
}

/// A captured, validated location record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordInput", into = "RecordInput")]
pub struct LocationRecord {
    input: RecordInput,
}

impl TryFrom<RecordInput> for LocationRecord {
    type Error = Error;

    fn try_from(mut input: RecordInput) -> Result<Self> {
        if !taxonomy::is_valid_pair(&input.main_kind, &input.sub_kind) {
            return Err(Error::InvalidRecord(format!(
                "'{}' is not a sub kind of '{}'",
                input.sub_kind, input.main_kind
            )));
        }

        for (label, value) in [("面積[m²]", input.area_m2), ("天高[cm]", input.ceiling_cm)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidRecord(format!(
                    "{} must be a non-negative number, got {}",
                    label, value
                )));
            }
        }

        // The headcount input only exists while 人数指定 is checked; it starts at 0.
        input.max_headcount = if input.headcount_specified {
            Some(input.max_headcount.unwrap_or(0))
        } else {
            None
        };

        let integers = [
            ("金額/day", Some(input.price_per_day)),
            ("金額/h", Some(input.price_per_hour)),
            ("最大人数", input.max_headcount),
        ];
        for (label, value) in integers {
            if let Some(v) = value.filter(|v| *v < 0) {
                return Err(Error::InvalidRecord(format!(
                    "{} must not be negative, got {}",
                    label, v
                )));
            }
        }

        Ok(Self { input })
    }
}

impl From<LocationRecord> for RecordInput {
    fn from(record: LocationRecord) -> Self {
        record.input
    }
}

impl LocationRecord {
    /// Parse and validate a record from YAML.
    pub fn from_yaml(text: &str) -> Result<Self> {
        RecordInput::from_yaml(text)?.capture()
    }

    pub fn name(&self) -> &str {
        &self.input.name
    }

    pub fn address(&self) -> &str {
        &self.input.address
    }

    pub fn details(&self) -> &DetailOptions {
        &self.input.details
    }

    /// The underlying form values.
    pub fn input(&self) -> &RecordInput {
        &self.input
    }

    /// Every field as `(label, value)`, in the fixed column order.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let r = &self.input;
        let text = |s: &str| FieldValue::Text(s.to_string());
        let time = |t: &NaiveTime| FieldValue::Text(t.format(hhmm::FORMAT).to_string());

        let mut fields = Vec::with_capacity(17 + DETAIL_OPTION_NAMES.len() + 10);
        fields.extend([
            ("ロケ地名", text(&r.name)),
            ("住所", text(&r.address)),
            ("HPリンク", text(&r.homepage)),
            ("大分類", text(&r.main_kind)),
            ("小分類", text(&r.sub_kind)),
            ("交通機関情報", text(&r.transport)),
            ("面積[m²]", FieldValue::Number(r.area_m2)),
            ("天高[cm]", FieldValue::Number(r.ceiling_cm)),
            ("担当者名", text(&r.contact_name)),
            ("電話番号", text(&r.phone)),
            ("メールアドレス", text(&r.email)),
            ("金額/day", FieldValue::Integer(r.price_per_day)),
            ("金額/h", FieldValue::Integer(r.price_per_hour)),
            ("金額備考", text(&r.price_note)),
            ("24時間可", FieldValue::Bool(r.open_24h)),
            ("開始時間", time(&r.start_time)),
            ("終了時間", time(&r.end_time)),
        ]);
        fields.extend(
            r.details
                .iter()
                .map(|(name, value)| (name, text(value.label()))),
        );
        fields.extend([
            ("人数指定", FieldValue::Bool(r.headcount_specified)),
            (
                "最大人数",
                r.max_headcount
                    .map_or(FieldValue::Empty, FieldValue::Integer),
            ),
            ("上限なし", FieldValue::Bool(r.unlimited_headcount)),
            ("不明(人数)", FieldValue::Bool(r.unknown_headcount)),
            ("支払い方法", text(r.payment.label())),
            ("支払い備考", text(&r.payment_note)),
            ("作品番号", text(&r.work_number)),
            ("担当者 PM", text(&r.pm_person)),
            ("担当者 P", text(&r.p_person)),
            ("コーディネーター", text(&r.coordinator)),
        ]);
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(record: &LocationRecord) -> Vec<&'static str> {
        record.fields().into_iter().map(|(label, _)| label).collect()
    }

    #[test]
    fn test_default_record_fields() {
        let record = RecordInput::default().capture().unwrap();
        let fields = record.fields();

        assert_eq!(fields.len(), 36);
        assert_eq!(fields[0].0, "ロケ地名");
        assert_eq!(fields[15], ("開始時間", FieldValue::Text("09:00".into())));
        assert_eq!(fields[16], ("終了時間", FieldValue::Text("18:00".into())));
        assert_eq!(fields[17], ("ゼネ車使用可否", FieldValue::Text("不明".into())));
        assert_eq!(fields[27], ("最大人数", FieldValue::Empty));
        assert_eq!(fields[30], ("支払い方法", FieldValue::Text("不明".into())));
        assert_eq!(fields[35].0, "コーディネーター");
    }

    #[test]
    fn test_column_order() {
        let record = RecordInput::default().capture().unwrap();
        let labels = labels(&record);
        let expected_tail = [
            "人数指定",
            "最大人数",
            "上限なし",
            "不明(人数)",
            "支払い方法",
            "支払い備考",
            "作品番号",
            "担当者 PM",
            "担当者 P",
            "コーディネーター",
        ];
        assert_eq!(&labels[17..26], &DETAIL_OPTION_NAMES[..]);
        assert_eq!(&labels[26..], &expected_tail[..]);
    }

    #[test]
    fn test_rejects_foreign_sub_kind() {
        let input = RecordInput {
            main_kind: "オフィス".into(),
            sub_kind: "和風".into(),
            ..RecordInput::default()
        };
        assert!(matches!(input.capture(), Err(Error::InvalidRecord(_))));
    }

    #[test]
    fn test_rejects_negative_numbers() {
        let input = RecordInput {
            area_m2: -1.0,
            ..RecordInput::default()
        };
        assert!(input.capture().is_err());

        let input = RecordInput {
            price_per_hour: -500,
            ..RecordInput::default()
        };
        assert!(input.capture().is_err());
    }

    #[test]
    fn test_max_headcount_only_when_specified() {
        let input = RecordInput {
            max_headcount: Some(30),
            ..RecordInput::default()
        };
        assert_eq!(input.capture().unwrap().input().max_headcount, None);

        let input = RecordInput {
            headcount_specified: true,
            ..RecordInput::default()
        };
        assert_eq!(input.capture().unwrap().input().max_headcount, Some(0));
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Number(45.0).display(), "45");
        assert_eq!(FieldValue::Number(2.5).display(), "2.5");
        assert_eq!(FieldValue::Integer(30000).display(), "30000");
        assert_eq!(FieldValue::Bool(true).display(), "TRUE");
        assert_eq!(FieldValue::Empty.display(), "");
    }

    #[test]
    fn test_detail_options() {
        let mut details = DetailOptions::new();
        details.set("電源の有無", Availability::Yes).unwrap();
        assert_eq!(details.get("電源の有無"), Some(Availability::Yes));
        assert_eq!(details.get("同録の可否"), Some(Availability::Unknown));
        assert_eq!(details.get("存在しない"), None);
        assert!(details.set("存在しない", Availability::No).is_err());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
name: 旧山田邸
address: 東京都世田谷区1-2-3
main_kind: 自然
sub_kind: 湖/池
area_m2: 120.5
price_per_day: 50000
open_24h: true
start_time: "08:30"
details:
  電源の有無: あり
  火器の使用可否: なし
payment: 請求書
headcount_specified: true
max_headcount: 25
"#;
        let record = LocationRecord::from_yaml(yaml).unwrap();
        assert_eq!(record.name(), "旧山田邸");
        assert_eq!(record.details().get("電源の有無"), Some(Availability::Yes));

        let fields = record.fields();
        let value = |label: &str| {
            fields
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.display())
                .unwrap()
        };
        assert_eq!(value("面積[m²]"), "120.5");
        assert_eq!(value("開始時間"), "08:30");
        assert_eq!(value("終了時間"), "18:00");
        assert_eq!(value("24時間可"), "TRUE");
        assert_eq!(value("火器の使用可否"), "なし");
        assert_eq!(value("支払い方法"), "請求書");
        assert_eq!(value("最大人数"), "25");
    }

    #[test]
    fn test_from_yaml_rejects_unknown_keys() {
        assert!(matches!(
            RecordInput::from_yaml("nmae: typo\n"),
            Err(Error::Yaml(_))
        ));
        assert!(LocationRecord::from_yaml("details:\n  温水: あり\n").is_err());
    }
}
