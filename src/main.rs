/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod api;
mod app;
mod config;
mod download;
mod error;
mod format;
mod intake;
mod model;
mod preview;
mod results;
mod state;
mod task;

#[cfg(target_arch = "wasm32")]
mod file_picker;

use app::ClaimInsightApp;
use config::ClientConfig;

// Desktop entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Requests run on this runtime; the UI thread only spawns onto it
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;
    let _guard = runtime.enter();

    let config = ClientConfig::from_env();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([820.0, 760.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "ClaimInsight",
        native_options,
        Box::new(|cc| Ok(Box::new(ClaimInsightApp::new(cc, config)))),
    )
}

// WASM entry point
#[cfg(target_arch = "wasm32")]
fn main() {
    use wasm_bindgen::JsCast;

    console_error_panic_hook::set_once();
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("the_canvas_id")
            .expect("Failed to find the_canvas_id")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("the_canvas_id is not a HtmlCanvasElement");

        let config = ClientConfig::from_env();

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(ClaimInsightApp::new(cc, config)))),
            )
            .await;

        // Remove loading text
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            if let Some(parent) = loading_text.parent_node() {
                parent.remove_child(&loading_text).ok();
            }
        }

        if let Err(e) = start_result {
            log::error!("Failed to start eframe: {:?}", e);
            panic!("Failed to start eframe: {:?}", e);
        }
    });
}
