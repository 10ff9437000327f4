mod settings;

pub use settings::{
    ChatSettings, Command, Config, ServiceSettings, Settings, UiSettings, API_KEY_ENV,
};
