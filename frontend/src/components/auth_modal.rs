//! 登录/注册模态框
//!
//! 注册模式先在本地校验两次密码一致，随后调用注册接口，
//! 成功后显式串联登录（注册本身从不建立会话）。
//! 失败时原样展示服务端的 detail 文本，模态框保持打开，
//! 认证状态不发生任何变化。

use crate::auth::{self, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;
use observatorio_shared::RegisterRequest;

/// 模态框模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[component]
pub fn AuthModal(
    mode: AuthMode,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_success: Callback<()>,
) -> impl IntoView {
    let auth_ctx = use_auth();
    let is_login = mode == AuthMode::Login;

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (full_name, set_full_name) = signal(String::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);

        if !is_login && password.get_untracked() != confirm.get_untracked() {
            set_error_msg.set(Some("Las contraseñas no coinciden".to_string()));
            return;
        }

        set_loading.set(true);
        spawn_local(async move {
            let correo = email.get_untracked();
            let clave = password.get_untracked();
            let result = if is_login {
                auth::login(&auth_ctx, &correo, &clave).await.map(|_| ())
            } else {
                let req = RegisterRequest {
                    email: correo.clone(),
                    password: clave.clone(),
                    full_name: full_name.get_untracked(),
                };
                match auth::register(&auth_ctx, &req).await {
                    // 注册成功后由本模态框决定自动登录
                    Ok(_) => auth::login(&auth_ctx, &correo, &clave).await.map(|_| ()),
                    Err(e) => Err(e),
                }
            };
            match result {
                Ok(()) => {
                    on_success.run(());
                    on_close.run(());
                }
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="modal modal-open" role="dialog">
            <div class="modal-box max-w-md">
                <div class="flex justify-between items-center mb-4">
                    <h2 class="text-xl font-bold">
                        {if is_login { "Iniciar sesión" } else { "Crear cuenta" }}
                    </h2>
                    <button class="btn btn-ghost btn-sm btn-square" on:click=move |_| on_close.run(())>
                        "✕"
                    </button>
                </div>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2 mb-3">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <form class="space-y-3" on:submit=on_submit>
                    <Show when=move || !is_login>
                        <div class="form-control">
                            <label class="label" for="full_name">
                                <span class="label-text">"Nombre completo"</span>
                            </label>
                            <input
                                id="full_name"
                                type="text"
                                required
                                class="input input-bordered w-full"
                                on:input=move |ev| set_full_name.set(event_target_value(&ev))
                                prop:value=full_name
                            />
                        </div>
                    </Show>
                    <div class="form-control">
                        <label class="label" for="email">
                            <span class="label-text">"Correo electrónico"</span>
                        </label>
                        <input
                            id="email"
                            type="email"
                            required
                            class="input input-bordered w-full"
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            prop:value=email
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="password">
                            <span class="label-text">"Contraseña"</span>
                        </label>
                        <input
                            id="password"
                            type="password"
                            required
                            class="input input-bordered w-full"
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            prop:value=password
                        />
                    </div>
                    <Show when=move || !is_login>
                        <div class="form-control">
                            <label class="label" for="confirm">
                                <span class="label-text">"Confirmar contraseña"</span>
                            </label>
                            <input
                                id="confirm"
                                type="password"
                                required
                                class="input input-bordered w-full"
                                on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                prop:value=confirm
                            />
                        </div>
                    </Show>
                    <button type="submit" class="btn btn-primary w-full" disabled=move || loading.get()>
                        {move || {
                            if loading.get() {
                                view! {
                                    <span class="loading loading-spinner"></span>
                                    "Procesando..."
                                }
                                    .into_any()
                            } else if is_login {
                                "Iniciar sesión".into_any()
                            } else {
                                "Registrarme".into_any()
                            }
                        }}
                    </button>
                </form>
            </div>
        </div>
    }
}
