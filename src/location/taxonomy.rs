//! Location kind taxonomy: main kinds and their sub kinds.

use phf::phf_ordered_map;

const HOUSE_STUDIO: &[&str] = &["和風", "洋風", "一軒家", "マンション", "アパート"];
const OFFICE: &[&str] = &["執務室", "会議室", "ロビー"];
const COMMERCIAL: &[&str] = &[
    "ショッピングモール",
    "遊園地",
    "温泉",
    "水族館/動物園/植物園",
    "博物館/美術館",
    "映画館",
    "ボーリング/ゲームセンター/ビリヤード場",
    "商店街",
    "ホテル",
];
const SCHOOL: &[&str] = &["小学校", "中学校", "高校", "大学/専門学校", "幼稚園/保育園"];
const HOSPITAL: &[&str] = &["受付", "手術室"];
const SHOP: &[&str] = &["コンビニ", "ドラッグストア", "スーパー", "アパレル", "ガソリンスタンド"];
const RESTAURANT: &[&str] = &["中華料理屋", "レストラン", "カフェ", "居酒屋", "食堂", "BAR"];
const NATURE: &[&str] = &["山", "川", "海", "草原", "森", "湖/池", "花畑", "道"];
const MISC: &[&str] = &[
    "駐車場",
    "屋上",
    "神社仏閣",
    "オープンスペース",
    "夜景/イルミネーション",
    "公民館",
    "スポーツ施設",
];
const NOT_APPLICABLE: &[&str] = &["その他"];

/// Main kind -> sub kinds, in presentation order.
static SUBKINDS: phf::OrderedMap<&'static str, &'static [&'static str]> = phf_ordered_map! {
    "ハウススタジオ" => HOUSE_STUDIO,
    "オフィス" => OFFICE,
    "商業施設" => COMMERCIAL,
    "学校" => SCHOOL,
    "病院" => HOSPITAL,
    "店舗" => SHOP,
    "飲食店" => RESTAURANT,
    "自然" => NATURE,
    "その他" => MISC,
    "該当なし" => NOT_APPLICABLE,
};

/// All main kinds in presentation order.
pub fn main_kinds() -> impl Iterator<Item = &'static str> {
    SUBKINDS.keys().copied()
}

/// Sub kinds of `main`, or `None` for an unknown main kind.
pub fn subkinds(main: &str) -> Option<&'static [&'static str]> {
    SUBKINDS.get(main).copied()
}

/// Whether `sub` is listed under `main`.
pub fn is_valid_pair(main: &str, sub: &str) -> bool {
    subkinds(main).is_some_and(|subs| subs.contains(&sub))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_kind_order() {
        let mains: Vec<_> = main_kinds().collect();
        assert_eq!(mains.len(), 10);
        assert_eq!(mains[0], "ハウススタジオ");
        assert_eq!(mains[9], "該当なし");
    }

    #[test]
    fn test_subkinds() {
        assert_eq!(subkinds("病院"), Some(&["受付", "手術室"][..]));
        assert_eq!(subkinds("自然").map(<[_]>::len), Some(8));
        assert_eq!(subkinds("宇宙"), None);
    }

    #[test]
    fn test_pairs() {
        assert!(is_valid_pair("飲食店", "BAR"));
        assert!(is_valid_pair("該当なし", "その他"));
        assert!(!is_valid_pair("オフィス", "和風"));
        assert!(!is_valid_pair("その他", "その他"));
    }
}
