/// Database utilities: connection pool and migration runner
///
/// The rest of the core never touches the pool directly — it goes through
/// the `MembershipStore` contract. These helpers exist for the binary that
/// wires a `PgMembershipStore` up at startup.

pub mod migrations;
pub mod pool;
