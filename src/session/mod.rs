mod filesystem;
mod memory;
mod storage;

pub use filesystem::{default_session_dir, FilesystemSessionStore};
pub use memory::MemorySessionStore;
pub use storage::{SessionStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
