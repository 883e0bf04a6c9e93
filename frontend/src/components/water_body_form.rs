//! 注册水体的表单模态框
//!
//! 文本输入先在本地做数值转换再发送：纬度/经度必填，
//! 温度/pH/溶解氧留空表示"未测量"，发送时直接省略字段。
//! 服务端返回 401 时提示会话过期并保持表单打开，已填内容不丢失。

use crate::auth::use_auth;
use leptos::prelude::*;
use leptos::task::spawn_local;
use observatorio_shared::{CreateWaterBodyRequest, WaterBody};

pub(crate) const TIPOS: [&str; 3] = ["Río", "Lago", "Océano"];
pub(crate) const CONTAMINACIONES: [&str; 5] =
    ["Baja", "Medio-Baja", "Medio", "Medio-Alto", "Alta"];
pub(crate) const BIODIVERSIDADES: [&str; 3] = ["Alta", "Media", "Baja"];

/// 空串/空白 → `None`；其余必须是合法数字
pub(crate) fn parse_optional_f64(texto: &str, campo: &str) -> Result<Option<f64>, String> {
    let texto = texto.trim();
    if texto.is_empty() {
        return Ok(None);
    }
    texto
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("El campo {campo} debe ser un número válido"))
}

pub(crate) fn parse_required_f64(texto: &str, campo: &str) -> Result<f64, String> {
    let texto = texto.trim();
    if texto.is_empty() {
        return Err(format!("El campo {campo} es obligatorio"));
    }
    texto
        .parse::<f64>()
        .map_err(|_| format!("El campo {campo} debe ser un número válido"))
}

/// 表单字段快照，提交前整体转换
#[derive(Debug, Clone, Default)]
pub(crate) struct FormFields {
    pub nombre: String,
    pub tipo: String,
    pub latitud: String,
    pub longitud: String,
    pub contaminacion: String,
    pub biodiversidad: String,
    pub descripcion: String,
    pub temperatura: String,
    pub ph: String,
    pub oxigeno_disuelto: String,
}

pub(crate) fn build_request(fields: &FormFields) -> Result<CreateWaterBodyRequest, String> {
    let nombre = fields.nombre.trim();
    if nombre.is_empty() {
        return Err("El nombre es obligatorio".to_string());
    }
    let descripcion = fields.descripcion.trim();
    Ok(CreateWaterBodyRequest {
        nombre: nombre.to_string(),
        tipo: fields.tipo.clone(),
        latitud: parse_required_f64(&fields.latitud, "latitud")?,
        longitud: parse_required_f64(&fields.longitud, "longitud")?,
        contaminacion: fields.contaminacion.clone(),
        biodiversidad: fields.biodiversidad.clone(),
        descripcion: (!descripcion.is_empty()).then(|| descripcion.to_string()),
        temperatura: parse_optional_f64(&fields.temperatura, "temperatura")?,
        ph: parse_optional_f64(&fields.ph, "pH")?,
        oxigeno_disuelto: parse_optional_f64(&fields.oxigeno_disuelto, "oxígeno disuelto")?,
    })
}

#[component]
pub fn WaterBodyForm(
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_created: Callback<WaterBody>,
) -> impl IntoView {
    let auth_ctx = use_auth();
    let user = auth_ctx.user_signal();
    let puede_crear = Signal::derive(move || {
        user.with(|u| u.as_ref().is_some_and(|u| u.can_create_water_bodies()))
    });

    let (nombre, set_nombre) = signal(String::new());
    let (tipo, set_tipo) = signal(TIPOS[0].to_string());
    let (latitud, set_latitud) = signal(String::new());
    let (longitud, set_longitud) = signal(String::new());
    let (contaminacion, set_contaminacion) = signal(CONTAMINACIONES[0].to_string());
    let (biodiversidad, set_biodiversidad) = signal(BIODIVERSIDADES[0].to_string());
    let (descripcion, set_descripcion) = signal(String::new());
    let (temperatura, set_temperatura) = signal(String::new());
    let (ph, set_ph) = signal(String::new());
    let (oxigeno, set_oxigeno) = signal(String::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);

        let fields = FormFields {
            nombre: nombre.get_untracked(),
            tipo: tipo.get_untracked(),
            latitud: latitud.get_untracked(),
            longitud: longitud.get_untracked(),
            contaminacion: contaminacion.get_untracked(),
            biodiversidad: biodiversidad.get_untracked(),
            descripcion: descripcion.get_untracked(),
            temperatura: temperatura.get_untracked(),
            ph: ph.get_untracked(),
            oxigeno_disuelto: oxigeno.get_untracked(),
        };
        let req = match build_request(&fields) {
            Ok(req) => req,
            Err(msg) => {
                set_error_msg.set(Some(msg));
                return;
            }
        };

        set_loading.set(true);
        spawn_local(async move {
            match auth_ctx.api().create_water_body(&req).await {
                Ok(creado) => {
                    on_created.run(creado);
                    on_close.run(());
                }
                Err(e) if e.is_unauthorized() => {
                    set_error_msg.set(Some(
                        "Tu sesión ha expirado. Vuelve a iniciar sesión para continuar."
                            .to_string(),
                    ));
                }
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="modal modal-open" role="dialog">
            <div class="modal-box max-w-lg">
                <div class="flex justify-between items-center mb-4">
                    <h2 class="text-xl font-bold">"Registrar cuerpo de agua"</h2>
                    <button class="btn btn-ghost btn-sm btn-square" on:click=move |_| on_close.run(())>
                        "✕"
                    </button>
                </div>

                // 界面层面的门禁；真正的授权校验在服务端
                <Show when=move || !puede_crear.get()>
                    <div role="alert" class="alert alert-warning text-sm py-2 mb-3">
                        <span>
                            "Tu cuenta no tiene permisos para registrar cuerpos de agua."
                        </span>
                    </div>
                </Show>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2 mb-3">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <form class="space-y-3" on:submit=on_submit>
                    <div class="form-control">
                        <label class="label" for="wb_nombre">
                            <span class="label-text">"Nombre"</span>
                        </label>
                        <input
                            id="wb_nombre"
                            type="text"
                            required
                            class="input input-bordered w-full"
                            on:input=move |ev| set_nombre.set(event_target_value(&ev))
                            prop:value=nombre
                        />
                    </div>

                    <div class="grid grid-cols-1 md:grid-cols-3 gap-3">
                        <div class="form-control">
                            <label class="label" for="wb_tipo">
                                <span class="label-text">"Tipo"</span>
                            </label>
                            <select
                                id="wb_tipo"
                                class="select select-bordered w-full"
                                on:change=move |ev| set_tipo.set(event_target_value(&ev))
                                prop:value=tipo
                            >
                                {TIPOS
                                    .iter()
                                    .map(|t| view! { <option value=*t>{*t}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label" for="wb_contaminacion">
                                <span class="label-text">"Contaminación"</span>
                            </label>
                            <select
                                id="wb_contaminacion"
                                class="select select-bordered w-full"
                                on:change=move |ev| set_contaminacion.set(event_target_value(&ev))
                                prop:value=contaminacion
                            >
                                {CONTAMINACIONES
                                    .iter()
                                    .map(|c| view! { <option value=*c>{*c}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label" for="wb_biodiversidad">
                                <span class="label-text">"Biodiversidad"</span>
                            </label>
                            <select
                                id="wb_biodiversidad"
                                class="select select-bordered w-full"
                                on:change=move |ev| set_biodiversidad.set(event_target_value(&ev))
                                prop:value=biodiversidad
                            >
                                {BIODIVERSIDADES
                                    .iter()
                                    .map(|b| view! { <option value=*b>{*b}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                    </div>

                    <div class="grid grid-cols-2 gap-3">
                        <div class="form-control">
                            <label class="label" for="wb_latitud">
                                <span class="label-text">"Latitud"</span>
                            </label>
                            <input
                                id="wb_latitud"
                                type="text"
                                inputmode="decimal"
                                placeholder="-4.2153"
                                required
                                class="input input-bordered w-full"
                                on:input=move |ev| set_latitud.set(event_target_value(&ev))
                                prop:value=latitud
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="wb_longitud">
                                <span class="label-text">"Longitud"</span>
                            </label>
                            <input
                                id="wb_longitud"
                                type="text"
                                inputmode="decimal"
                                placeholder="-69.9406"
                                required
                                class="input input-bordered w-full"
                                on:input=move |ev| set_longitud.set(event_target_value(&ev))
                                prop:value=longitud
                            />
                        </div>
                    </div>

                    <div class="form-control">
                        <label class="label" for="wb_descripcion">
                            <span class="label-text">"Descripción (opcional)"</span>
                        </label>
                        <textarea
                            id="wb_descripcion"
                            class="textarea textarea-bordered w-full"
                            rows="2"
                            on:input=move |ev| set_descripcion.set(event_target_value(&ev))
                            prop:value=descripcion
                        ></textarea>
                    </div>

                    <div class="grid grid-cols-3 gap-3">
                        <div class="form-control">
                            <label class="label" for="wb_temperatura">
                                <span class="label-text">"Temp. (°C)"</span>
                            </label>
                            <input
                                id="wb_temperatura"
                                type="text"
                                inputmode="decimal"
                                class="input input-bordered w-full"
                                on:input=move |ev| set_temperatura.set(event_target_value(&ev))
                                prop:value=temperatura
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="wb_ph">
                                <span class="label-text">"pH"</span>
                            </label>
                            <input
                                id="wb_ph"
                                type="text"
                                inputmode="decimal"
                                class="input input-bordered w-full"
                                on:input=move |ev| set_ph.set(event_target_value(&ev))
                                prop:value=ph
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="wb_oxigeno">
                                <span class="label-text">"O₂ disuelto"</span>
                            </label>
                            <input
                                id="wb_oxigeno"
                                type="text"
                                inputmode="decimal"
                                class="input input-bordered w-full"
                                on:input=move |ev| set_oxigeno.set(event_target_value(&ev))
                                prop:value=oxigeno
                            />
                        </div>
                    </div>

                    <button
                        type="submit"
                        class="btn btn-primary w-full"
                        disabled=move || loading.get() || !puede_crear.get()
                    >
                        {move || {
                            if loading.get() {
                                view! {
                                    <span class="loading loading-spinner"></span>
                                    "Enviando..."
                                }
                                    .into_any()
                            } else {
                                "Registrar".into_any()
                            }
                        }}
                    </button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_ok() -> FormFields {
        FormFields {
            nombre: "Río Amazonas".into(),
            tipo: "Río".into(),
            latitud: "-4.2153".into(),
            longitud: " -69.9406 ".into(),
            contaminacion: "Medio".into(),
            biodiversidad: "Alta".into(),
            descripcion: String::new(),
            temperatura: "26.5".into(),
            ph: String::new(),
            oxigeno_disuelto: "  ".into(),
        }
    }

    #[test]
    fn optional_blank_is_none() {
        assert_eq!(parse_optional_f64("", "pH"), Ok(None));
        assert_eq!(parse_optional_f64("   ", "pH"), Ok(None));
        assert_eq!(parse_optional_f64("7.2", "pH"), Ok(Some(7.2)));
        assert!(parse_optional_f64("siete", "pH").is_err());
    }

    #[test]
    fn required_rejects_blank_and_garbage() {
        assert_eq!(parse_required_f64(" -4.5 ", "latitud"), Ok(-4.5));
        assert!(parse_required_f64("", "latitud").is_err());
        assert!(parse_required_f64("norte", "latitud").is_err());
    }

    #[test]
    fn request_coerces_and_omits_blanks() {
        let req = build_request(&fields_ok()).unwrap();
        assert_eq!(req.latitud, -4.2153);
        assert_eq!(req.longitud, -69.9406);
        assert_eq!(req.temperatura, Some(26.5));
        assert_eq!(req.ph, None);
        assert_eq!(req.oxigeno_disuelto, None);
        assert_eq!(req.descripcion, None);
        // 省略的可选字段不出现在 JSON 里
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("\"ph\""));
        assert!(!json.contains("oxigeno_disuelto"));
    }

    #[test]
    fn request_requires_name_and_coordinates() {
        let mut f = fields_ok();
        f.nombre = "  ".into();
        assert!(build_request(&f).is_err());

        let mut f = fields_ok();
        f.latitud = String::new();
        assert_eq!(
            build_request(&f).unwrap_err(),
            "El campo latitud es obligatorio".to_string()
        );

        let mut f = fields_ok();
        f.longitud = "oeste".into();
        assert!(build_request(&f).unwrap_err().contains("número válido"));
    }
}
