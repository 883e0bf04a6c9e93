//! 地图视图组件
//!
//! 每个通过过滤的记录在 (latitud, longitud) 处渲染一个标记，
//! 颜色由固定的类型→颜色映射决定（未知类型为灰色）。
//! 无聚合、无视口裁剪——所有标记无条件渲染，列表超过几百条
//! 时这是一个已知的可扩展性上限。

use crate::auth::use_auth;
use crate::components::icons::Star;
use crate::leaflet::{LeafletMap, MapMarker};
use leptos::html::Div;
use leptos::logging::warn;
use leptos::prelude::*;
use observatorio_shared::{WaterBody, WaterBodyFilter, WaterBodyKind, filter_water_bodies};

const MAP_CENTER: (f64, f64) = (-15.0, -60.0);
const MAP_ZOOM: f64 = 3.0;

/// 固定的类型→颜色映射
pub(crate) fn color_for(tipo: &str) -> &'static str {
    match WaterBodyKind::classify(tipo) {
        WaterBodyKind::Rio => "#3b82f6",
        WaterBodyKind::Lago => "#16a34a",
        WaterBodyKind::Oceano => "#6366f1",
        WaterBodyKind::Desconocido => "#6b7280",
    }
}

/// 弹窗内容来自服务端数据，插入前必须转义
pub(crate) fn escape_html(texto: &str) -> String {
    texto
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub(crate) fn popup_html(cuerpo: &WaterBody) -> String {
    let mut html = format!(
        "<div class=\"space-y-1\">\
         <h3 class=\"font-bold\">{}</h3>\
         <p class=\"text-sm\"><strong>Tipo:</strong> {}</p>\
         <p class=\"text-sm\"><strong>Contaminación:</strong> {}</p>\
         <p class=\"text-sm\"><strong>Biodiversidad:</strong> {}</p>",
        escape_html(&cuerpo.nombre),
        escape_html(&cuerpo.tipo),
        escape_html(&cuerpo.contaminacion),
        escape_html(&cuerpo.biodiversidad),
    );
    if let Some(descripcion) = &cuerpo.descripcion {
        html.push_str(&format!(
            "<p class=\"text-sm opacity-70\">{}</p>",
            escape_html(descripcion)
        ));
    }
    html.push_str("</div>");
    html
}

#[component]
pub fn MapView(
    #[prop(into)] cuerpos: Signal<Vec<WaterBody>>,
    #[prop(into)] filtro: Signal<WaterBodyFilter>,
    #[prop(into)] on_favorite: Callback<i64>,
) -> impl IntoView {
    let auth_ctx = use_auth();
    let is_authenticated = auth_ctx.is_authenticated_signal();

    let container_ref = NodeRef::<Div>::new();
    let map_handle = StoredValue::new_local(Option::<LeafletMap>::None);
    let markers = StoredValue::new_local(Vec::<MapMarker>::new());
    let (selected, set_selected) = signal(Option::<WaterBody>::None);

    // 容器就绪后建图；列表或过滤键变化时整体重绘标记
    Effect::new(move |_| {
        let Some(container) = container_ref.get() else {
            return;
        };
        if map_handle.with_value(|m| m.is_none()) {
            match LeafletMap::mount(&container, MAP_CENTER, MAP_ZOOM) {
                Ok(map) => map_handle.set_value(Some(map)),
                Err(e) => {
                    warn!("no se pudo inicializar el mapa: {e}");
                    return;
                }
            }
        }

        let visibles = filter_water_bodies(&cuerpos.get(), filtro.get());
        markers.update_value(|ms| {
            for marker in ms.drain(..) {
                marker.remove();
            }
        });
        map_handle.with_value(|maybe| {
            let Some(map) = maybe.as_ref() else { return };
            for cuerpo in visibles {
                let html = popup_html(&cuerpo);
                let color = color_for(&cuerpo.tipo);
                let (lat, lng) = (cuerpo.latitud, cuerpo.longitud);
                let body = cuerpo.clone();
                let result = map.add_marker(lat, lng, color, &html, move || {
                    set_selected.set(Some(body.clone()))
                });
                match result {
                    Ok(marker) => markers.update_value(|ms| ms.push(marker)),
                    Err(e) => warn!("no se pudo colocar el marcador: {e}"),
                }
            }
        });
    });

    view! {
        <div class="w-full">
            <div node_ref=container_ref class="h-[520px] rounded-xl overflow-hidden z-0"></div>

            // 选中记录的详情面板
            {move || {
                selected
                    .get()
                    .map(|cuerpo| {
                        let id = cuerpo.id;
                        view! {
                            <div class="mt-4 card bg-base-100 shadow">
                                <div class="card-body p-4">
                                    <div class="flex justify-between items-start">
                                        <div>
                                            <h3 class="text-lg font-semibold">{cuerpo.nombre.clone()}</h3>
                                            <p class="text-sm text-base-content/60">
                                                {format!(
                                                    "{} · {} · Biodiversidad {}",
                                                    cuerpo.tipo,
                                                    cuerpo.contaminacion,
                                                    cuerpo.biodiversidad,
                                                )}
                                            </p>
                                        </div>
                                        <button
                                            class="btn btn-ghost btn-sm"
                                            on:click=move |_| set_selected.set(None)
                                        >
                                            "Cerrar"
                                        </button>
                                    </div>
                                    {cuerpo
                                        .descripcion
                                        .clone()
                                        .map(|d| view! { <p class="mt-2 text-sm">{d}</p> })}
                                    <Show when=move || is_authenticated.get()>
                                        <div class="card-actions justify-end">
                                            <button
                                                class="btn btn-outline btn-sm gap-2"
                                                on:click=move |_| on_favorite.run(id)
                                            >
                                                <Star attr:class="h-4 w-4" />
                                                "Guardar como favorito"
                                            </button>
                                        </div>
                                    </Show>
                                </div>
                            </div>
                        }
                    })
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_follows_fixed_mapping() {
        assert_eq!(color_for("Río"), "#3b82f6");
        assert_eq!(color_for("rio grande"), "#3b82f6");
        assert_eq!(color_for("Lago"), "#16a34a");
        assert_eq!(color_for("Océano"), "#6366f1");
        // 未识别类型 → 灰色
        assert_eq!(color_for("Humedal"), "#6b7280");
    }

    #[test]
    fn popup_escapes_server_text() {
        let cuerpo = WaterBody {
            id: 1,
            nombre: "<script>alert(1)</script>".into(),
            tipo: "Río".into(),
            latitud: 4.6,
            longitud: -74.1,
            contaminacion: "Baja".into(),
            biodiversidad: "Alta".into(),
            descripcion: Some("agua & peces".into()),
            temperatura: None,
            ph: None,
            oxigeno_disuelto: None,
            fecha_actualizacion: None,
        };
        let html = popup_html(&cuerpo);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("agua &amp; peces"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn popup_omits_absent_description() {
        let cuerpo = WaterBody {
            id: 1,
            nombre: "Lago Azul".into(),
            tipo: "Lago".into(),
            latitud: 0.0,
            longitud: 0.0,
            contaminacion: "Medio".into(),
            biodiversidad: "Media".into(),
            descripcion: None,
            temperatura: None,
            ph: None,
            oxigeno_disuelto: None,
            fecha_actualizacion: None,
        };
        let html = popup_html(&cuerpo);
        assert!(html.contains("Lago Azul"));
        assert!(!html.contains("opacity-70"));
    }
}
