/// External service integrations
///
/// - `jsonplaceholder`: the external todo API the import endpoint pulls from

pub mod jsonplaceholder;
