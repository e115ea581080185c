/// Asynchronous texture loading for the textured variant
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{HtmlImageElement, WebGl2RenderingContext as GL};

/// Start loading `url` into texture unit 0.
///
/// `on_ready` runs after the image has been uploaded. A failed load is only
/// logged; the surface keeps drawing without a texture.
pub fn load_texture<F>(gl: &GL, url: &str, on_ready: F) -> Result<(), JsValue>
where
    F: FnOnce() + 'static,
{
    let texture = gl.create_texture().ok_or("could not create texture")?;
    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));

    let onload = {
        let gl = gl.clone();
        let image = image.clone();
        let url = url.to_string();
        Closure::once(move || {
            gl.active_texture(GL::TEXTURE0);
            gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
            gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
            gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
            gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::REPEAT as i32);
            gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::REPEAT as i32);

            match gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
                GL::TEXTURE_2D,
                0,
                GL::RGBA as i32,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                &image,
            ) {
                Ok(()) => {
                    log::info!("texture {url} loaded");
                    on_ready();
                }
                Err(e) => log::warn!("texture {url} upload failed: {e:?}"),
            }
        })
    };
    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    let onerror = {
        let url = url.to_string();
        Closure::once(move || log::warn!("texture {url} failed to load, drawing without it"))
    };
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    image.set_src(url);
    Ok(())
}
