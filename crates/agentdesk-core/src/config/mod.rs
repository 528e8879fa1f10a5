mod settings;

pub use settings::{Config, IngestSettings, Settings, StorageSettings, WebSettings, TOKEN_ENV};
