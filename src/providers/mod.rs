pub mod file_system_provider;
pub mod memory_provider;
pub mod provider;

pub use file_system_provider::FileSystemVaultProvider;
pub use memory_provider::MemoryVaultProvider;
pub use provider::{EntryKind, VaultProvider};
