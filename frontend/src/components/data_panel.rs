//! 数据面板
//!
//! 三个客户端统计卡片、水体表格、辅助数据集的监测网概览、
//! 未解决的警报，以及服务端 `/estadisticas` 的汇总行。
//! 统计每次渲染从完整列表重新计算。

use crate::AuxData;
use crate::auth::use_auth;
use crate::components::icons::Star;
use chrono::NaiveDateTime;
use leptos::prelude::*;
use observatorio_shared::{DashboardStats, Estadisticas, Favorite, WaterBody};

/// 后端不发送日期时显示 "N/D"
pub(crate) fn format_fecha(fecha: &Option<NaiveDateTime>) -> String {
    match fecha {
        Some(f) => f.format("%d/%m/%Y").to_string(),
        None => "N/D".to_string(),
    }
}

#[component]
pub fn DataPanel(
    #[prop(into)] cuerpos: Signal<Vec<WaterBody>>,
    #[prop(into)] aux: Signal<AuxData>,
    #[prop(into)] estadisticas: Signal<Option<Estadisticas>>,
    #[prop(into)] favoritos: Signal<Vec<Favorite>>,
    #[prop(into)] on_favorite: Callback<i64>,
) -> impl IntoView {
    let auth_ctx = use_auth();
    let is_authenticated = auth_ctx.is_authenticated_signal();
    let stats = Memo::new(move |_| cuerpos.with(|c| DashboardStats::compute(c)));

    let alertas_activas = move || {
        aux.with(|a| {
            a.alertas
                .iter()
                .filter(|alerta| !alerta.resuelta)
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="space-y-6">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title text-2xl">"Datos de Monitoreo"</h2>

                    <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                        <div class="stat">
                            <div class="stat-title">"Total Cuerpos de Agua"</div>
                            <div class="stat-value text-primary">{move || stats.get().total}</div>
                            <div class="stat-desc">"Registros almacenados"</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Biodiversidad Alta"</div>
                            <div class="stat-value text-success">
                                {move || stats.get().biodiversidad_alta}
                            </div>
                            <div class="stat-desc">"Ecosistemas saludables"</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Contaminación Media/Alta"</div>
                            <div class="stat-value text-error">
                                {move || stats.get().contaminacion_media_alta}
                            </div>
                            <div class="stat-desc">"Requieren atención"</div>
                        </div>
                    </div>

                    <div class="overflow-x-auto w-full mt-4">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Nombre"</th>
                                    <th>"Tipo"</th>
                                    <th>"Contaminación"</th>
                                    <th>"Biodiversidad"</th>
                                    <th>"Última actualización"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || cuerpos.with(Vec::is_empty)>
                                    <tr>
                                        <td colspan="6" class="text-center py-8 text-base-content/50">
                                            "Sin registros todavía."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || cuerpos.get()
                                    key=|c| c.id
                                    children=move |cuerpo| {
                                        let id = cuerpo.id;
                                        let es_favorito = move || {
                                            favoritos
                                                .with(|f| f.iter().any(|fav| fav.cuerpo_agua_id == id))
                                        };
                                        view! {
                                            <tr>
                                                <td class="font-semibold">{cuerpo.nombre.clone()}</td>
                                                <td>{cuerpo.tipo.clone()}</td>
                                                <td>{cuerpo.contaminacion.clone()}</td>
                                                <td>{cuerpo.biodiversidad.clone()}</td>
                                                <td class="text-sm text-base-content/60">
                                                    {format_fecha(&cuerpo.fecha_actualizacion)}
                                                </td>
                                                <td>
                                                    <Show when=move || is_authenticated.get()>
                                                        <button
                                                            class=move || {
                                                                if es_favorito() {
                                                                    "btn btn-ghost btn-sm btn-square text-warning"
                                                                } else {
                                                                    "btn btn-ghost btn-sm btn-square"
                                                                }
                                                            }
                                                            disabled=es_favorito
                                                            title="Guardar como favorito"
                                                            on:click=move |_| on_favorite.run(id)
                                                        >
                                                            <Star attr:class="h-4 w-4" />
                                                        </button>
                                                    </Show>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Red de monitoreo"</h3>
                    <div class="flex flex-wrap gap-2">
                        <div class="badge badge-outline gap-1">
                            "Sensores: " {move || aux.with(|a| a.sensores.len())}
                        </div>
                        <div class="badge badge-outline gap-1">
                            "Parámetros: " {move || aux.with(|a| a.parametros.len())}
                        </div>
                        <div class="badge badge-outline gap-1">
                            "Lecturas: " {move || aux.with(|a| a.lecturas.len())}
                        </div>
                        <div class="badge badge-outline gap-1">
                            "Zonas protegidas: " {move || aux.with(|a| a.zonas.len())}
                        </div>
                        <div class="badge badge-outline gap-1">
                            "Reportes: " {move || aux.with(|a| a.reportes.len())}
                        </div>
                    </div>

                    <h3 class="card-title mt-4">"Alertas activas"</h3>
                    <Show when=move || alertas_activas().is_empty()>
                        <p class="text-sm text-base-content/50">"Sin alertas activas."</p>
                    </Show>
                    <For
                        each=alertas_activas
                        key=|alerta| alerta.id
                        children=|alerta| {
                            view! {
                                <div role="alert" class="alert alert-warning py-2 text-sm">
                                    <span class="badge badge-neutral">{alerta.nivel.clone()}</span>
                                    <span>{alerta.mensaje.clone()}</span>
                                </div>
                            }
                        }
                    />

                    {move || {
                        estadisticas
                            .get()
                            .map(|e| {
                                let actualizado = e
                                    .ultima_actualizacion
                                    .map(|f| {
                                        format!(" · actualizado {}", f.format("%d/%m/%Y %H:%M"))
                                    })
                                    .unwrap_or_default();
                                view! {
                                    <p class="text-sm text-base-content/60 mt-4">
                                        {format!(
                                            "Según la API: {} cuerpos de agua · {} sensores · {} alertas · {} parámetros{}",
                                            e.total_cuerpos_agua,
                                            e.total_sensores,
                                            e.total_alertas,
                                            e.total_parametros,
                                            actualizado,
                                        )}
                                    </p>
                                }
                            })
                    }}
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fecha_formats_or_nd() {
        assert_eq!(format_fecha(&None), "N/D");
        let fecha = NaiveDate::from_ymd_opt(2026, 8, 25)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(format_fecha(&Some(fecha)), "25/08/2026");
    }
}
