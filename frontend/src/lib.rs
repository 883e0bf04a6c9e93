//! Observatorio de Aguas 前端应用
//!
//! 单页仪表盘：地图/数据/关于三个标签页，无 URL 路由。
//! - `api`: REST 客户端（令牌只读）
//! - `auth`: 认证状态管理（令牌唯一写入者）
//! - `leaflet`: 地图互操作绑定
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod auth_modal;
    pub mod data_panel;
    mod icons;
    pub mod map_view;
    pub mod water_body_form;

    pub(crate) use icons::{Droplet, LogOut, Plus, RefreshCw};
}
mod leaflet;
mod serde_helper;

use crate::api::{ApiResult, ObservatorioApi};
use crate::auth::{AuthContext, init_auth};
use crate::components::auth_modal::{AuthMode, AuthModal};
use crate::components::data_panel::DataPanel;
use crate::components::map_view::MapView;
use crate::components::water_body_form::WaterBodyForm;
use crate::components::{Droplet, LogOut, Plus, RefreshCw};

use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use observatorio_shared::{
    Alert, Estadisticas, Favorite, Parameter, ProtectedZone, Reading, Report, Sensor, WaterBody,
    WaterBodyFilter,
};
use std::time::Duration;

/// 标签页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Mapa,
    Datos,
    Acerca,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Mapa, Tab::Datos, Tab::Acerca];

    fn label(self) -> &'static str {
        match self {
            Tab::Mapa => "Mapa",
            Tab::Datos => "Datos",
            Tab::Acerca => "Acerca de",
        }
    }
}

/// 只读辅助数据集，一次并行拉取后整体持有
#[derive(Clone, Default, PartialEq)]
pub struct AuxData {
    pub sensores: Vec<Sensor>,
    pub parametros: Vec<Parameter>,
    pub lecturas: Vec<Reading>,
    pub alertas: Vec<Alert>,
    pub zonas: Vec<ProtectedZone>,
    pub reportes: Vec<Report>,
}

/// 辅助数据集按"尽力而为"处理：单个端点失败只记日志，
/// 面板展示空集，不打断主流程。
fn keep<T>(res: ApiResult<Vec<T>>, nombre: &str) -> Vec<T> {
    match res {
        Ok(items) => items,
        Err(e) => {
            warn!("no se pudo cargar {nombre}: {e}");
            Vec::new()
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let auth_ctx = AuthContext::new(ObservatorioApi::from_env());
    provide_context(auth_ctx);
    init_auth(&auth_ctx);

    let is_authenticated = auth_ctx.is_authenticated_signal();
    let user = auth_ctx.user_signal();

    let (tab, set_tab) = signal(Tab::Mapa);
    let (filtro, set_filtro) = signal(WaterBodyFilter::Todos);
    let (cuerpos, set_cuerpos) = signal(Vec::<WaterBody>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (aux, set_aux) = signal(AuxData::default());
    let (estadisticas, set_estadisticas) = signal(Option::<Estadisticas>::None);
    let (favoritos, set_favoritos) = signal(Vec::<Favorite>::new());
    let (auth_modal, set_auth_modal) = signal(Option::<AuthMode>::None);
    let (show_form, set_show_form) = signal(false);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    // 通知 3 秒后自动消失
    let notify = move |mensaje: String, es_error: bool| {
        set_notification.set(Some((mensaje, es_error)));
        set_timeout(
            move || set_notification.set(None),
            Duration::from_secs(3),
        );
    };

    let fetch_cuerpos = move || {
        let api = auth_ctx.api();
        set_loading.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            match api.water_bodies().await {
                Ok(lista) => set_cuerpos.set(lista),
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    };

    let fetch_aux = move || {
        let api = auth_ctx.api();
        spawn_local(async move {
            let (sensores, parametros, lecturas, alertas, zonas, reportes, estadisticas) = futures::join!(
                api.sensors(),
                api.parameters(),
                api.readings(),
                api.alerts(),
                api.protected_zones(),
                api.reports(),
                api.estadisticas(),
            );
            set_aux.set(AuxData {
                sensores: keep(sensores, "los sensores"),
                parametros: keep(parametros, "los parámetros"),
                lecturas: keep(lecturas, "las lecturas"),
                alertas: keep(alertas, "las alertas"),
                zonas: keep(zonas, "las zonas protegidas"),
                reportes: keep(reportes, "los reportes"),
            });
            match estadisticas {
                Ok(e) => set_estadisticas.set(Some(e)),
                Err(e) => warn!("no se pudieron cargar las estadísticas: {e}"),
            }
        });
    };

    let fetch_favoritos = move || {
        if !is_authenticated.get_untracked() {
            set_favoritos.set(Vec::new());
            return;
        }
        let api = auth_ctx.api();
        spawn_local(async move {
            match api.favorites().await {
                Ok(lista) => set_favoritos.set(lista),
                Err(e) => warn!("no se pudieron cargar los favoritos: {e}"),
            }
        });
    };

    // 挂载时拉取一次；会话建立或销毁时整体重新拉取
    let usuario_id = Memo::new(move |_| user.with(|u| u.as_ref().map(|u| u.id)));
    Effect::new(move |_| {
        let _ = usuario_id.get();
        fetch_cuerpos();
        fetch_aux();
        fetch_favoritos();
    });

    let on_favorite = Callback::new(move |cuerpo_agua_id: i64| {
        let api = auth_ctx.api();
        spawn_local(async move {
            match api.create_favorite(cuerpo_agua_id).await {
                Ok(_) => {
                    notify("Guardado en favoritos".to_string(), false);
                    fetch_favoritos();
                }
                Err(e) => notify(e.to_string(), true),
            }
        });
    });

    let on_created = Callback::new(move |_: WaterBody| {
        notify("Cuerpo de agua registrado".to_string(), false);
        fetch_cuerpos();
    });

    let puede_crear =
        Signal::derive(move || user.with(|u| u.as_ref().is_some_and(|u| u.can_create_water_bodies())));

    view! {
        <div class="min-h-screen bg-base-200">
            // ===== 顶部导航 =====
            <div class="navbar bg-base-100 shadow-md px-4">
                <div class="flex-1 gap-2">
                    <Droplet attr:class="h-7 w-7 text-primary" />
                    <span class="text-xl font-bold">"Observatorio de Aguas"</span>
                </div>
                <div class="flex-none gap-2">
                    <Show
                        when=move || is_authenticated.get()
                        fallback=move || {
                            view! {
                                <button
                                    class="btn btn-ghost btn-sm"
                                    on:click=move |_| set_auth_modal.set(Some(AuthMode::Login))
                                >
                                    "Iniciar sesión"
                                </button>
                                <button
                                    class="btn btn-primary btn-sm"
                                    on:click=move |_| set_auth_modal.set(Some(AuthMode::Register))
                                >
                                    "Registrarse"
                                </button>
                            }
                        }
                    >
                        <span class="text-sm text-base-content/70">
                            {move || user.with(|u| u.as_ref().map(|u| u.full_name.clone()))}
                        </span>
                        {move || {
                            user.with(|u| u.as_ref().and_then(|u| u.role.clone()))
                                .map(|rol| view! { <span class="badge badge-outline badge-sm">{rol}</span> })
                        }}
                        <button
                            class="btn btn-ghost btn-sm gap-2"
                            on:click=move |_| auth::logout(&auth_ctx)
                        >
                            <LogOut attr:class="h-4 w-4" />
                            "Salir"
                        </button>
                    </Show>
                </div>
            </div>

            // ===== 通知 =====
            {move || {
                notification
                    .get()
                    .map(|(mensaje, es_error)| {
                        let clase = if es_error {
                            "alert alert-error shadow-lg"
                        } else {
                            "alert alert-success shadow-lg"
                        };
                        view! {
                            <div class="toast toast-top toast-end z-[1000]">
                                <div role="alert" class=clase>
                                    <span>{mensaje}</span>
                                </div>
                            </div>
                        }
                    })
            }}

            <main class="container mx-auto p-4 space-y-4">
                // ===== 标签页切换 =====
                <div role="tablist" class="tabs tabs-boxed bg-base-100 w-fit">
                    {Tab::ALL
                        .iter()
                        .map(|t| {
                            let t = *t;
                            view! {
                                <button
                                    role="tab"
                                    class=move || {
                                        if tab.get() == t { "tab tab-active" } else { "tab" }
                                    }
                                    on:click=move |_| set_tab.set(t)
                                >
                                    {t.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>

                {move || match tab.get() {
                    Tab::Mapa => {
                        view! {
                            <div class="space-y-4">
                                <div class="flex flex-wrap items-center gap-2">
                                    // 客户端过滤，不重新请求
                                    {WaterBodyFilter::ALL
                                        .iter()
                                        .map(|f| {
                                            let f = *f;
                                            view! {
                                                <button
                                                    class=move || {
                                                        if filtro.get() == f {
                                                            "btn btn-sm btn-primary"
                                                        } else {
                                                            "btn btn-sm btn-ghost"
                                                        }
                                                    }
                                                    on:click=move |_| set_filtro.set(f)
                                                >
                                                    {f.label()}
                                                </button>
                                            }
                                        })
                                        .collect_view()}
                                    <div class="grow"></div>
                                    <button
                                        class="btn btn-ghost btn-sm gap-2"
                                        on:click=move |_| fetch_cuerpos()
                                    >
                                        <RefreshCw attr:class="h-4 w-4" />
                                        "Actualizar"
                                    </button>
                                    <Show
                                        when=move || puede_crear.get()
                                        fallback=move || {
                                            view! {
                                                <Show when=move || !is_authenticated.get()>
                                                    <button
                                                        class="link link-primary text-sm"
                                                        on:click=move |_| {
                                                            set_auth_modal.set(Some(AuthMode::Login))
                                                        }
                                                    >
                                                        "Inicia sesión para registrar"
                                                    </button>
                                                </Show>
                                            }
                                        }
                                    >
                                        <button
                                            class="btn btn-primary btn-sm gap-2"
                                            on:click=move |_| set_show_form.set(true)
                                        >
                                            <Plus attr:class="h-4 w-4" />
                                            "Registrar cuerpo de agua"
                                        </button>
                                    </Show>
                                </div>

                                <Show when=move || error_msg.get().is_some()>
                                    <div role="alert" class="alert alert-error">
                                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                                        <button
                                            class="btn btn-sm btn-ghost"
                                            on:click=move |_| fetch_cuerpos()
                                        >
                                            "Reintentar"
                                        </button>
                                    </div>
                                </Show>

                                <Show when=move || loading.get()>
                                    <div class="flex justify-center py-4">
                                        <span class="loading loading-spinner loading-lg text-primary"></span>
                                    </div>
                                </Show>

                                <MapView cuerpos=cuerpos filtro=filtro on_favorite=on_favorite />
                            </div>
                        }
                            .into_any()
                    }
                    Tab::Datos => {
                        view! {
                            <DataPanel
                                cuerpos=cuerpos
                                aux=aux
                                estadisticas=estadisticas
                                favoritos=favoritos
                                on_favorite=on_favorite
                            />
                        }
                            .into_any()
                    }
                    Tab::Acerca => {
                        view! {
                            <div class="card bg-base-100 shadow-xl max-w-2xl">
                                <div class="card-body">
                                    <h2 class="card-title text-2xl">"Acerca del observatorio"</h2>
                                    <p>
                                        "El Observatorio de Aguas reúne registros de ríos, lagos y "
                                        "océanos con sus niveles de contaminación y biodiversidad, "
                                        "junto a la red de sensores que los monitorea."
                                    </p>
                                    <p class="text-sm text-base-content/60">
                                        "Los datos provienen de la API pública del observatorio. "
                                        "Cualquier persona puede consultarlos; para registrar nuevos "
                                        "cuerpos de agua se requiere una cuenta con rol de analista."
                                    </p>
                                </div>
                            </div>
                        }
                            .into_any()
                    }
                }}
            </main>

            // ===== 模态框 =====
            {move || {
                auth_modal
                    .get()
                    .map(|mode| {
                        view! {
                            <AuthModal
                                mode=mode
                                on_close=move |_| set_auth_modal.set(None)
                                on_success=move |_| notify("Sesión iniciada".to_string(), false)
                            />
                        }
                    })
            }}
            <Show when=move || show_form.get()>
                <WaterBodyForm
                    on_close=move |_| set_show_form.set(false)
                    on_created=on_created
                />
            </Show>
        </div>
    }
}
