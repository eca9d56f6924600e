// reservoir-core/src/summary/category.rs

use super::address::base_vector_name;
use log::trace;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SummaryCategory {
    #[default]
    Invalid,
    Field,
    Aquifer,
    Network,
    Misc,
    Region,
    RegionToRegion,
    Group,
    Well,
    WellCompletion,
    WellConnection,
    WellLgr,
    WellConnectionLgr,
    WellSegment,
    Block,
    BlockLgr,
    Imported,
    Time,
}

const MISC_KEYWORDS: &[&str] = &[
    "TIME", "DAY", "DAYS", "MONTH", "YEAR", "YEARS", "DATE", "TIMESTEP", "ELAPSED", "MAXDPR",
    "MAXDSO", "MAXDSG", "MAXDSW", "STEPTYPE", "MSUMLINS", "MSUMNEWT", "NEWTON", "NLINEARS",
    "NLINSMIN", "NLINSMAX", "MLINEARS", "TCPU", "TCPUDAY", "TCPUTS", "TELAPLIN", "TELAPDAY",
];

const REGION_TO_REGION_KEYWORDS: &[&str] = &[
    "ROFR", "ROFR+", "ROFR-", "ROFT", "ROFT+", "ROFT-", "ROFTL", "ROFTG", "RGFR", "RGFR+",
    "RGFR-", "RGFT", "RGFT+", "RGFT-", "RGFTL", "RGFTG", "RWFR", "RWFR+", "RWFR-", "RWFT",
    "RWFT+", "RWFT-", "REFR", "REFR+", "REFR-", "REFT", "REFT+", "REFT-",
];

fn has_valid_characters(vector_name: &str) -> bool {
    vector_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '#'))
}

fn keyword_category(vector_name: &str) -> Option<SummaryCategory> {
    if MISC_KEYWORDS.contains(&vector_name) {
        return Some(SummaryCategory::Misc);
    }
    if REGION_TO_REGION_KEYWORDS.contains(&vector_name) {
        return Some(SummaryCategory::RegionToRegion);
    }
    None
}

fn prefix_category(vector_name: &str) -> Option<SummaryCategory> {
    if vector_name.len() >= 2 {
        match &vector_name[..2] {
            "LB" => return Some(SummaryCategory::BlockLgr),
            "LC" => return Some(SummaryCategory::WellConnectionLgr),
            "LW" => return Some(SummaryCategory::WellLgr),
            _ => {}
        }
    }
    match vector_name.chars().next()? {
        'A' => Some(SummaryCategory::Aquifer),
        'B' => Some(SummaryCategory::Block),
        'C' => Some(SummaryCategory::WellConnection),
        'F' => Some(SummaryCategory::Field),
        'G' => Some(SummaryCategory::Group),
        'N' => Some(SummaryCategory::Network),
        'R' => Some(SummaryCategory::Region),
        'S' => Some(SummaryCategory::WellSegment),
        'W' => Some(SummaryCategory::Well),
        _ => None,
    }
}

/// Category implied by a vector name, or `None` when the name is not a
/// recognizable simulator keyword.
pub fn identify_category(vector_name: &str) -> Option<SummaryCategory> {
    if vector_name.len() < 3 || vector_name.len() > 8 || !has_valid_characters(vector_name) {
        trace!("Not a simulator keyword: {:?}", vector_name);
        return None;
    }

    if let Some(category) = keyword_category(vector_name) {
        return Some(category);
    }

    // User defined quantities, e.g. WUOPR, carry the category in the first letter
    let bytes = vector_name.as_bytes();
    if bytes[1] == b'U' {
        if let Some(category) = prefix_category(&vector_name[..1]) {
            return Some(category);
        }
    }

    let mut base = base_vector_name(vector_name);
    while base.ends_with('_') {
        base.pop();
    }
    if base.len() < 2 {
        return None;
    }
    if let Some(category) = keyword_category(&base) {
        return Some(category);
    }
    prefix_category(&base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_rules() {
        assert_eq!(identify_category("WOPR"), Some(SummaryCategory::Well));
        assert_eq!(identify_category("GGPT"), Some(SummaryCategory::Group));
        assert_eq!(identify_category("FOPT"), Some(SummaryCategory::Field));
        assert_eq!(identify_category("BPR"), Some(SummaryCategory::Block));
        assert_eq!(identify_category("CWIR"), Some(SummaryCategory::WellConnection));
        assert_eq!(identify_category("LBPR"), Some(SummaryCategory::BlockLgr));
        assert_eq!(identify_category("LCOFR"), Some(SummaryCategory::WellConnectionLgr));
        assert_eq!(identify_category("LWBHP"), Some(SummaryCategory::WellLgr));
        assert_eq!(identify_category("SOFR"), Some(SummaryCategory::WellSegment));
        assert_eq!(identify_category("AAQR"), Some(SummaryCategory::Aquifer));
        assert_eq!(identify_category("NPR"), Some(SummaryCategory::Network));
    }

    #[test]
    fn test_keyword_table_before_prefix() {
        assert_eq!(identify_category("ROFT"), Some(SummaryCategory::RegionToRegion));
        assert_eq!(identify_category("RPR"), Some(SummaryCategory::Region));
        assert_eq!(identify_category("TCPU"), Some(SummaryCategory::Misc));
        assert_eq!(identify_category("ROFT_A"), Some(SummaryCategory::RegionToRegion));
    }

    #[test]
    fn test_rejects_malformed_names() {
        assert_eq!(identify_category("WO"), None);
        assert_eq!(identify_category("WOPRWOPRW"), None);
        assert_eq!(identify_category("WO PR"), None);
        assert_eq!(identify_category("XYZ"), None);
    }
}
