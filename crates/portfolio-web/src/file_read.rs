//! One-shot `FileReader` decoding to a data URI.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, File, FileReader};

/// Start decoding `file` and call `on_done` exactly once when the read ends,
/// with the data URI or `None` on failure.
///
/// The handler is installed only after the read started and removes itself
/// when it fires, so neither the reader nor its result outlives the call.
pub fn read_data_uri(
    file: &File,
    on_done: impl FnOnce(Option<String>) + 'static,
) -> Result<FileReader, JsValue> {
    let reader = FileReader::new()?;
    reader.read_as_data_url(file)?;
    let onloadend = Closure::once_into_js(move |event: Event| {
        let reader = event
            .target()
            .and_then(|target| target.dyn_into::<FileReader>().ok());
        let data_uri = reader.as_ref().and_then(|reader| {
            reader.set_onloadend(None);
            reader.result().ok()?.as_string()
        });
        on_done(data_uri);
    });
    reader.set_onloadend(Some(onloadend.unchecked_ref()));
    Ok(reader)
}
