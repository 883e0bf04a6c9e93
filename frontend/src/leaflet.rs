//! Leaflet 互操作绑定
//!
//! 通过 `wasm_bindgen` 绑定页面上全局加载的 Leaflet（`index.html`
//! 以 script 标签引入，暴露为 `window.L`）。瓦片渲染完全委托给
//! Leaflet，这里只负责建图、放标记、绑弹窗。

use crate::serde_helper;
use js_sys::Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

#[wasm_bindgen]
unsafe extern "C" {
    type JsMap;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    fn l_map(container: &web_sys::HtmlDivElement) -> JsMap;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &JsMap, center: &Array, zoom: f64);

    type JsTileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn l_tile_layer(url: &str, options: &JsValue) -> JsTileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &JsTileLayer, map: &JsMap);

    type JsIcon;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    fn l_div_icon(options: &JsValue) -> JsIcon;

    type JsMarker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn l_marker(latlng: &Array, options: &JsValue) -> JsMarker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to_map(this: &JsMarker, map: &JsMap);

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &JsMarker, html: &str);

    #[wasm_bindgen(method)]
    fn remove(this: &JsMarker);

    #[wasm_bindgen(method)]
    fn on(this: &JsMarker, event: &str, handler: &js_sys::Function);
}

#[derive(Serialize)]
struct TileLayerOptions {
    attribution: &'static str,
}

#[derive(Serialize)]
struct DivIconOptions {
    html: String,
    #[serde(rename = "className")]
    class_name: &'static str,
    #[serde(rename = "iconSize")]
    icon_size: [f64; 2],
    #[serde(rename = "iconAnchor")]
    icon_anchor: [f64; 2],
}

fn lat_lng(lat: f64, lng: f64) -> Array {
    let arr = Array::new();
    arr.push(&JsValue::from_f64(lat));
    arr.push(&JsValue::from_f64(lng));
    arr
}

/// 已挂载的地图实例
pub struct LeafletMap {
    inner: JsMap,
}

impl LeafletMap {
    /// 在容器元素上创建地图并加载 OSM 瓦片图层
    pub fn mount(
        container: &web_sys::HtmlDivElement,
        center: (f64, f64),
        zoom: f64,
    ) -> Result<Self, serde_helper::Error> {
        let map = l_map(container);
        map.set_view(&lat_lng(center.0, center.1), zoom);
        let opts = serde_helper::to_value(&TileLayerOptions {
            attribution: OSM_ATTRIBUTION,
        })?;
        l_tile_layer(OSM_TILE_URL, &opts).add_to(&map);
        Ok(Self { inner: map })
    }

    /// 放置一个圆点标记并绑定弹窗
    ///
    /// `color` 为 CSS 颜色值；点击回调在标记存活期间一直有效。
    pub fn add_marker(
        &self,
        lat: f64,
        lng: f64,
        color: &str,
        popup_html: &str,
        on_click: impl Fn() + 'static,
    ) -> Result<MapMarker, serde_helper::Error> {
        let icon_opts = serde_helper::to_value(&DivIconOptions {
            html: format!(
                r#"<div style="background:{color};width:14px;height:14px;border-radius:50%;border:2px solid white"></div>"#
            ),
            class_name: "custom-marker",
            icon_size: [14.0, 14.0],
            icon_anchor: [7.0, 7.0],
        })?;
        let icon = l_div_icon(&icon_opts);

        let marker_opts = js_sys::Object::new();
        js_sys::Reflect::set(&marker_opts, &JsValue::from_str("icon"), icon.as_ref())
            .map_err(serde_helper::Error::JsSys)?;

        let marker = l_marker(&lat_lng(lat, lng), &marker_opts.into());
        marker.add_to_map(&self.inner);
        marker.bind_popup(popup_html);

        let closure = Closure::<dyn Fn()>::new(on_click);
        marker.on("click", closure.as_ref().unchecked_ref());

        Ok(MapMarker {
            inner: marker,
            _on_click: closure,
        })
    }
}

/// 地图上的一个标记；drop 前调用 [`MapMarker::remove`] 将其从图层移除
pub struct MapMarker {
    inner: JsMarker,
    // 标记存活期间点击回调必须保持有效
    _on_click: Closure<dyn Fn()>,
}

impl MapMarker {
    pub fn remove(&self) {
        self.inner.remove();
    }
}
