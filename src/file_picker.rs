/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Browser file dialog via a hidden `<input type="file">`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::intake;
use crate::model::SelectedImage;

/// Open the file dialog and read the first chosen file.
/// Resolves to `Ok(None)` when the dialog is cancelled.
pub async fn pick_image() -> Result<Option<SelectedImage>, String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("No document available")?;

    let input: web_sys::HtmlInputElement = document
        .create_element("input")
        .map_err(|e| format!("Failed to create input element: {:?}", e))?
        .dyn_into()
        .map_err(|_| "Created element is not an input".to_string())?;
    input.set_type("file");
    input.set_accept(intake::ACCEPT_ATTR);

    // The executor runs synchronously, so the resolver is available right after
    let mut resolver = None;
    let settled = js_sys::Promise::new(&mut |resolve, _reject| resolver = Some(resolve));
    let resolve = resolver.ok_or("File dialog promise has no resolver")?;

    // Either `change` or `cancel` settles the dialog; a second call is a no-op
    let on_settle = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        resolve.call1(&JsValue::NULL, &event).ok();
    });
    input.set_onchange(Some(on_settle.as_ref().unchecked_ref()));
    input
        .add_event_listener_with_callback("cancel", on_settle.as_ref().unchecked_ref())
        .map_err(|e| format!("Failed to watch file dialog: {:?}", e))?;
    input.click();

    let outcome = JsFuture::from(settled).await;
    input.set_onchange(None);
    input
        .remove_event_listener_with_callback("cancel", on_settle.as_ref().unchecked_ref())
        .ok();
    drop(on_settle);
    outcome.map_err(|e| format!("File dialog error: {:?}", e))?;

    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", file.name(), e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Ok(Some(intake::selected_image(file.name(), &file.type_(), bytes)))
}
