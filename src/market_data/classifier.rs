// Decide whether a query names an on-chain token or a ticker/coin id.
//
// Heuristic only, no checksum or base58 validation: a 31+ character ticker
// will be routed to the DEX providers. The boundary decides which provider
// branch runs, so it stays exactly as is.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueryKind {
    Address,
    Symbol,
}

const EVM_ADDRESS_LEN: usize = 42;
const LONG_ADDRESS_MIN_LEN: usize = 31;

pub fn classify(query: &str) -> QueryKind {
    let len = query.chars().count();
    if (query.starts_with("0x") && len == EVM_ADDRESS_LEN) || len >= LONG_ADDRESS_MIN_LEN {
        QueryKind::Address
    } else {
        QueryKind::Symbol
    }
}
