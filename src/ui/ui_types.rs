use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(serde::Serialize, serde::Deserialize, Default)]
pub struct App {
    #[serde(skip)]
    pub session: Option<crate::session::Session>,

    /// flipped when the work queue drains; read by main for the exit status
    #[serde(skip)]
    pub completed: Arc<AtomicBool>,

    #[serde(skip)]
    pub errors: Vec<String>,

    #[serde(skip)]
    pub texture: Option<egui::TextureHandle>,

    /// fileID the texture was decoded from
    #[serde(skip)]
    pub texture_file: Option<String>,

    #[serde(skip)]
    pub image_size: (usize, usize),

    #[serde(skip)]
    pub current_tab: Tab,

    pub options: crate::options::Options,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum Tab {
    Annotate,
    Options,
}

impl Default for Tab {
    fn default() -> Self {
        Tab::Annotate
    }
}
