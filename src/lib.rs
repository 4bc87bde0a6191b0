pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod payload;
pub mod renderer;
pub mod types;
pub mod validate;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod history_panel;
#[cfg(target_arch = "wasm32")]
mod logger;
#[cfg(target_arch = "wasm32")]
mod qr_preview;
#[cfg(target_arch = "wasm32")]
pub mod storage;

pub use error::{Error, Result};
pub use history::{HistoryStore, KeyValueStore, MemoryStorage};
pub use payload::{encode, Payload};
pub use renderer::{QrCodegenRenderer, Renderer};
pub use types::{FormRecord, HistoryItem, QrType, Style};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main_js() -> std::result::Result<(), wasm_bindgen::JsValue> {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();

    logger::init();
    log::info!("QR Studio starting");

    yew::start_app::<app::Main>();

    Ok(())
}
