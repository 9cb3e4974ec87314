#[cfg(feature = "local-transport")]
pub mod local;
