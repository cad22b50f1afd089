use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use mapview_shared::ImageSize;

/// Fetch and decode the background image. Resolves once, with the element
/// ready to draw.
pub async fn load_image(url: &str) -> Result<(HtmlImageElement, ImageSize), JsValue> {
    let image = HtmlImageElement::new()?;
    image.set_src(url);
    JsFuture::from(image.decode()).await?;
    let size = ImageSize {
        width: f64::from(image.natural_width()),
        height: f64::from(image.natural_height()),
    };
    Ok((image, size))
}
