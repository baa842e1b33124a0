//! FileReader → Image によるデコード
//!
//! コールバックをPromiseに包み、呼び出し側からは単純な`async fn`として扱う。

use braincheck_common::{DecodedImage, ImageDimensions};
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileReader, HtmlImageElement};

/// ファイルを画像としてデコードし、寸法とプレビュー用Data URLを返す
pub async fn decode_image(file: &File) -> Result<DecodedImage, JsValue> {
    let data_url = read_as_data_url(file).await?;
    let dimensions = load_dimensions(&data_url).await?;
    Ok(DecodedImage {
        dimensions,
        preview_src: data_url,
    })
}

async fn read_as_data_url(file: &File) -> Result<String, JsValue> {
    let reader = FileReader::new()?;

    let promise = Promise::new(&mut |resolve: Function, reject: Function| {
        let reader_clone = reader.clone();
        let on_reject = reject.clone();
        let onload = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
            match reader_clone.result() {
                Ok(result) => {
                    let _ = resolve.call1(&JsValue::NULL, &result);
                }
                Err(e) => {
                    let _ = on_reject.call1(&JsValue::NULL, &e);
                }
            }
        }) as Box<dyn FnMut(_)>);

        let onerror = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("File could not be read"));
        }) as Box<dyn FnMut(_)>);

        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
    });

    reader.read_as_data_url(file)?;
    let value = JsFuture::from(promise).await?;
    value
        .as_string()
        .ok_or_else(|| JsValue::from_str("File could not be read as a data URL"))
}

async fn load_dimensions(data_url: &str) -> Result<ImageDimensions, JsValue> {
    let image = HtmlImageElement::new()?;

    let promise = Promise::new(&mut |resolve: Function, reject: Function| {
        let onload = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let _ = resolve.call0(&JsValue::NULL);
        }) as Box<dyn FnMut(_)>);

        let onerror = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("File is not a supported image"));
        }) as Box<dyn FnMut(_)>);

        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
    });

    image.set_src(data_url);
    JsFuture::from(promise).await?;

    Ok(ImageDimensions::new(image.natural_width(), image.natural_height()))
}
