//! Translation pipeline: scene walk, API client, fonts, layout and the batch
//! orchestrator that ties them together.

pub mod credentials;
pub mod fonts;
pub mod layout;
pub mod orchestrator;
pub mod translator;
pub mod traversal;

pub use credentials::{CredentialStore, MemoryCredentialStore, RedbCredentialStore};
pub use fonts::{FontLoader, FontResolver};
pub use layout::{NamingStyle, Placement, SuggestionLayoutEngine, SuggestionStyle};
pub use translator::{RapidApiBackend, TranslationBackend, TranslationClient};
pub use traversal::{SceneTraverser, WorkItem};
