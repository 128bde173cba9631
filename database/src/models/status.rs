/// The singleton status row (`id = 1`) recording which ledger state the
/// index reflects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
    pub ledger_index: u32,
    pub protocol_version: u8,
    pub network_name: String,
    pub database_version: u32,
}
