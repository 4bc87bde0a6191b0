//! File downloads of the rendered code.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

/// `qr-artifact-<millis>.<ext>`
pub fn artifact_file_name(millis: i64, format: ExportFormat) -> String {
    format!("qr-artifact-{}.{}", millis, format.extension())
}

#[cfg(target_arch = "wasm32")]
pub use self::browser::{download_png, download_svg};

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use js_sys::Array;
    use wasm_bindgen::{closure::Closure, JsCast, JsValue};
    use web_sys::{
        Blob, BlobPropertyBag, CanvasRenderingContext2d, Document, HtmlAnchorElement,
        HtmlCanvasElement, HtmlImageElement, Url,
    };

    fn document() -> Result<Document, JsValue> {
        web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document"))
    }

    fn svg_blob(svg: &str) -> Result<Blob, JsValue> {
        let options = BlobPropertyBag::new();
        options.set_type("image/svg+xml");
        Blob::new_with_str_sequence_and_options(&Array::of1(&JsValue::from_str(svg)), &options)
    }

    fn click_download(href: &str, file_name: &str) -> Result<(), JsValue> {
        let a: HtmlAnchorElement = document()?.create_element("a")?.unchecked_into();
        a.set_href(href);
        a.set_download(file_name);
        a.click();
        Ok(())
    }

    pub fn download_svg(svg: &str, file_name: &str) -> Result<(), JsValue> {
        let blob = svg_blob(svg)?;
        let blob_url = Url::create_object_url_with_blob(&blob)?;
        let result = click_download(&blob_url, file_name);
        Url::revoke_object_url(&blob_url)?;
        result
    }

    /// Rasterizes `svg` onto a `size`×`size` canvas and downloads it as PNG.
    pub async fn download_png(svg: String, size: u32, file_name: String) -> Result<(), JsValue> {
        let blob = svg_blob(&svg)?;
        let blob_url = Url::create_object_url_with_blob(&blob)?;
        let data_url = rasterize(&blob_url, size).await;
        Url::revoke_object_url(&blob_url)?;
        click_download(&data_url?, &file_name)
    }

    async fn rasterize(src: &str, size: u32) -> Result<String, JsValue> {
        let image = HtmlImageElement::new()?;

        let (sender, receiver) = oneshot::channel::<Result<(), JsValue>>();
        let sender = Rc::new(RefCell::new(Some(sender)));
        let onload = {
            let sender = sender.clone();
            Closure::wrap(Box::new(move || {
                if let Some(sender) = sender.borrow_mut().take() {
                    let _ = sender.send(Ok(()));
                }
            }) as Box<dyn FnMut()>)
        };
        let onerror = Closure::wrap(Box::new(move |err: JsValue| {
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(Err(err));
            }
        }) as Box<dyn FnMut(JsValue)>);

        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        image.set_src(src);

        let loaded = receiver
            .await
            .map_err(|_| JsValue::from_str("image loading was cancelled"));
        image.set_onload(None);
        image.set_onerror(None);
        loaded??;

        let canvas: HtmlCanvasElement = document()?.create_element("canvas")?.dyn_into()?;
        canvas.set_width(size);
        canvas.set_height(size);
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d canvas context is not available"))?
            .dyn_into()?;
        let edge = f64::from(size);
        context.draw_image_with_html_image_element_and_dw_and_dh(&image, 0.0, 0.0, edge, edge)?;

        canvas.to_data_url_with_type("image/png")
    }
}
