// reservoir-core/src/summary/codec.rs

use super::address::{ijk_from_text, region_pair_from_text, StatisticsType, SummaryAddress, UNSET};
use super::category::{identify_category, SummaryCategory};
use log::trace;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

pub const ADDRESS_LIST_MAX_LENGTH: usize = 50;

const TOKEN_SEPARATOR: char = ':';

/// Text form `[STAT:][ERR:]VECTOR[:Q1[:Q2[:Q3]]]`.
pub fn encode(address: &SummaryAddress) -> String {
    let mut text = String::new();
    if let Some(prefix) = address.statistics().prefix() {
        text.push_str(prefix);
        text.push(TOKEN_SEPARATOR);
    }
    if address.is_error_result() {
        text.push_str("ERR");
        text.push(TOKEN_SEPARATOR);
    }
    text.push_str(address.vector_name());
    let item = address.item_text();
    if !item.is_empty() {
        text.push(TOKEN_SEPARATOR);
        text.push_str(&item);
    }
    text
}

fn is_error_marker(token: &str) -> bool {
    matches!(
        token.trim().to_ascii_uppercase().as_str(),
        "ER" | "ERR" | "ERROR"
    )
}

/// Parses a text address. Never fails: text that does not describe a known
/// category comes back as an imported address holding the raw text.
pub fn decode(text: &str) -> SummaryAddress {
    let mut tokens: Vec<&str> = text.split(TOKEN_SEPARATOR).map(str::trim).collect();

    let mut is_error_result = false;
    let mut statistics = StatisticsType::None;
    while tokens.len() > 1 {
        if !is_error_result && is_error_marker(tokens[0]) {
            is_error_result = true;
            tokens.remove(0);
        } else if statistics == StatisticsType::None {
            match StatisticsType::from_prefix(tokens[0]) {
                Some(found) => {
                    statistics = found;
                    tokens.remove(0);
                }
                None => break,
            }
        } else {
            break;
        }
    }

    match from_tokens(&tokens) {
        Some(mut address) => {
            address.set_error_result(is_error_result);
            address.set_statistics(statistics);
            address
        }
        None => {
            trace!("Unrecognized address text {:?}, keeping as imported", text);
            SummaryAddress::imported(text, None)
        }
    }
}

fn parse_int(token: &str) -> Option<i32> {
    token.trim().parse().ok()
}

fn parse_ijk(token: &str) -> Option<(i32, i32, i32)> {
    let ijk = ijk_from_text(token);
    (ijk.0 != UNSET).then_some(ijk)
}

fn non_empty(token: &str) -> Option<&str> {
    (!token.is_empty()).then_some(token)
}

fn from_tokens(tokens: &[&str]) -> Option<SummaryAddress> {
    let vector_name = non_empty(tokens.first().copied().unwrap_or(""))?;
    if tokens.len() == 1 && vector_name == "TIME" {
        return Some(SummaryAddress::time());
    }

    let category = identify_category(vector_name)?;
    let token1 = tokens.get(1).copied().unwrap_or("");
    let token2 = tokens.get(2).copied().unwrap_or("");
    let token3 = tokens.get(3).copied().unwrap_or("");

    let address = match category {
        SummaryCategory::Field => SummaryAddress::field(vector_name, None),
        SummaryCategory::Misc => SummaryAddress::misc(vector_name, None),
        SummaryCategory::Aquifer => SummaryAddress::aquifer(vector_name, parse_int(token1)?, None),
        SummaryCategory::Network => {
            // Network names may contain the separator
            let network_name = if tokens.len() > 3 {
                format!("{}{}{}", token1, TOKEN_SEPARATOR, token2)
            } else {
                token1.to_string()
            };
            SummaryAddress::network(vector_name, &network_name, None)
        }
        SummaryCategory::Region => SummaryAddress::region(vector_name, parse_int(token1)?, None),
        SummaryCategory::RegionToRegion => {
            let (r1, r2) = region_pair_from_text(token1);
            if r1 == UNSET {
                return None;
            }
            SummaryAddress::region_to_region(vector_name, r1, r2, None)
        }
        SummaryCategory::Group => SummaryAddress::group(vector_name, non_empty(token1)?, None),
        SummaryCategory::Well => {
            if tokens.len() == 3 && vector_name.starts_with('W') {
                SummaryAddress::well_completion(
                    vector_name,
                    non_empty(token1)?,
                    parse_int(token2)?,
                    None,
                )
            } else {
                SummaryAddress::well(vector_name, non_empty(token1)?, None)
            }
        }
        SummaryCategory::WellCompletion => SummaryAddress::well_completion(
            vector_name,
            non_empty(token1)?,
            parse_int(token2)?,
            None,
        ),
        SummaryCategory::WellConnection => {
            let (i, j, k) = parse_ijk(token2)?;
            SummaryAddress::well_connection(vector_name, non_empty(token1)?, i, j, k, None)
        }
        SummaryCategory::WellLgr => {
            SummaryAddress::well_lgr(vector_name, non_empty(token1)?, non_empty(token2)?, None)
        }
        SummaryCategory::WellConnectionLgr => {
            let (i, j, k) = parse_ijk(token3)?;
            SummaryAddress::well_connection_lgr(
                vector_name,
                non_empty(token1)?,
                non_empty(token2)?,
                i,
                j,
                k,
                None,
            )
        }
        SummaryCategory::WellSegment => SummaryAddress::well_segment(
            vector_name,
            non_empty(token1)?,
            parse_int(token2)?,
            None,
        ),
        SummaryCategory::Block => {
            let (i, j, k) = parse_ijk(token1)?;
            SummaryAddress::block(vector_name, i, j, k, None)
        }
        SummaryCategory::BlockLgr => {
            let (i, j, k) = parse_ijk(token2)?;
            SummaryAddress::block_lgr(vector_name, non_empty(token1)?, i, j, k, None)
        }
        SummaryCategory::Imported | SummaryCategory::Time | SummaryCategory::Invalid => {
            return None
        }
    };
    Some(address)
}

/// Joins the text forms, cut to [`ADDRESS_LIST_MAX_LENGTH`] characters
/// followed by `...` when longer.
pub fn join_addresses<'a, I>(addresses: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a SummaryAddress>,
{
    let text = addresses
        .into_iter()
        .map(encode)
        .collect::<Vec<_>>()
        .join(separator);
    if text.chars().count() > ADDRESS_LIST_MAX_LENGTH {
        let mut truncated: String = text.chars().take(ADDRESS_LIST_MAX_LENGTH).collect();
        truncated.push_str("...");
        truncated
    } else {
        text
    }
}

impl fmt::Display for SummaryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encode(self))
    }
}

impl FromStr for SummaryAddress {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(decode(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory_addresses() -> Vec<SummaryAddress> {
        vec![
            SummaryAddress::field("FOPT", None),
            SummaryAddress::aquifer("AAQR", 2, None),
            SummaryAddress::network("NPR", "NET1", None),
            SummaryAddress::misc("TCPU", None),
            SummaryAddress::region("RPR", 7, None),
            SummaryAddress::region_to_region("ROFT", 1, 2, None),
            SummaryAddress::group("GOPR", "MANI-B", None),
            SummaryAddress::well("WOPR", "OP_1", None),
            SummaryAddress::well_completion("WOPRL", "OP_1", 3, None),
            SummaryAddress::well_connection("COFR", "OP_1", 10, 20, 30, None),
            SummaryAddress::well_lgr("LWBHP", "LGR1", "OP_1", None),
            SummaryAddress::well_connection_lgr("LCOFR", "LGR1", "OP_1", 1, 2, 3, None),
            SummaryAddress::well_segment("SOFR", "OP_1", 5, None),
            SummaryAddress::block("BPR", 1, 2, 3, None),
            SummaryAddress::block_lgr("LBPR", "LGR1", 4, 5, 6, None),
            SummaryAddress::time(),
        ]
    }

    #[test]
    fn test_round_trip_every_category() {
        for address in factory_addresses() {
            assert!(address.is_valid(), "{:?}", address);
            let text = encode(&address);
            assert_eq!(decode(&text), address, "round trip of {}", text);
        }
    }

    #[test]
    fn test_round_trip_keeps_cell_ijk() {
        let decoded = decode(&encode(&SummaryAddress::block("BPR", 1, 2, 3, None)));
        assert_eq!(
            (decoded.cell_i(), decoded.cell_j(), decoded.cell_k()),
            (1, 2, 3)
        );
        assert_eq!(encode(&decoded), "BPR:1,2,3");
    }

    #[test]
    fn test_error_and_statistics_prefixes() {
        let address = decode("error:WOPR:OP_1");
        assert!(address.is_error_result());
        assert_eq!(address.well_name(), Some("OP_1"));
        assert_eq!(encode(&address), "ERR:WOPR:OP_1");

        let address = decode("P90:FOPT");
        assert_eq!(address.statistics(), StatisticsType::P90);
        assert_eq!(address.category(), SummaryCategory::Field);

        let mut address = SummaryAddress::well("WBHP", "I1", None);
        address.set_error_result(true);
        address.set_statistics(StatisticsType::Mean);
        assert_eq!(decode(&encode(&address)), address);
    }

    #[test]
    fn test_three_token_well_becomes_completion() {
        let address = decode("WOPR:OP_1:2");
        assert_eq!(address.category(), SummaryCategory::WellCompletion);
        assert_eq!(address.well_completion_number(), 2);
    }

    #[test]
    fn test_network_name_with_separator() {
        let address = decode("NPR:BRANCH:A:X");
        assert_eq!(address.category(), SummaryCategory::Network);
        assert_eq!(address.network_name(), Some("BRANCH:A"));
    }

    #[test]
    fn test_region_to_region_with_spaces() {
        let address = decode("RGFT:3 - 4");
        assert_eq!(address.region_number(), 3);
        assert_eq!(address.region_number2(), 4);
    }

    #[test]
    fn test_unrecognized_text_is_imported() {
        let address = decode("MY CUSTOM VECTOR");
        assert_eq!(address.category(), SummaryCategory::Imported);
        assert_eq!(address.vector_name(), "MY CUSTOM VECTOR");
        assert!(!address.is_valid());

        let address = decode("BPR:1,x,3");
        assert_eq!(address.category(), SummaryCategory::Imported);
        assert_eq!(address.vector_name(), "BPR:1,x,3");

        let address = decode("  my vector ");
        assert_eq!(address.category(), SummaryCategory::Imported);
        assert_eq!(address.vector_name(), "  my vector ");
    }

    #[test]
    fn test_join_addresses_truncates() {
        let addresses: Vec<_> = (0..10)
            .map(|i| SummaryAddress::region("RPR", i, None))
            .collect();
        let text = join_addresses(&addresses, ", ");
        assert!(text.ends_with("..."));
        assert_eq!(text.chars().count(), ADDRESS_LIST_MAX_LENGTH + 3);
        assert_eq!(join_addresses(&addresses[..2], ", "), "RPR:0, RPR:1");
    }
}
