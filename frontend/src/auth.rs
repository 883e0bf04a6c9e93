//! 认证模块
//!
//! 管理用户会话：localStorage 中的 bearer 令牌与内存中的当前用户。
//! 本模块是令牌的唯一写入者；API 客户端只读取它来构造请求头。
//!
//! 会话生命周期：登录成功时创建；每次页面加载通过 `/auth/me`
//! 惰性校验；显式登出或校验失败时销毁（静默丢弃令牌，不向用户报错）。

use crate::api::{ApiResult, ObservatorioApi};
use gloo_storage::{LocalStorage, Storage};
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use observatorio_shared::{RegisterRequest, User};

const STORAGE_TOKEN_KEY: &str = "observatorio_token";

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 当前用户（会话有效时存在）
    pub user: Option<User>,
    /// 初始会话校验是否仍在进行
    pub loading: bool,
}

/// 认证上下文
///
/// 整个应用只提供一个实例，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
    api: StoredValue<ObservatorioApi>,
}

impl AuthContext {
    pub fn new(api: ObservatorioApi) -> Self {
        let (state, set_state) = signal(AuthState {
            user: None,
            loading: true,
        });
        Self {
            state,
            set_state,
            api: StoredValue::new(api),
        }
    }

    pub fn api(&self) -> ObservatorioApi {
        self.api.get_value()
    }

    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user.is_some()))
    }

    pub fn user_signal(&self) -> Signal<Option<User>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user.clone()))
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 若存在已保存的令牌则静默校验会话；任何失败都丢弃令牌并
/// 以未登录状态结束，不向用户报错。
pub fn init_auth(ctx: &AuthContext) {
    if stored_token().is_none() {
        ctx.set_state.update(|s| s.loading = false);
        return;
    }
    let api = ctx.api();
    let set_state = ctx.set_state;
    spawn_local(async move {
        match api.current_user().await {
            Ok(user) => set_state.update(|s| {
                s.user = Some(user);
                s.loading = false;
            }),
            Err(e) => {
                warn!("sesión almacenada inválida, descartando token: {e}");
                clear_token();
                set_state.update(|s| {
                    s.user = None;
                    s.loading = false;
                });
            }
        }
    });
}

/// 登录：提交凭据，保存令牌，然后解析当前用户
///
/// 两步都成功会话才算建立。第二步失败时移除刚保存的令牌并
/// 返回错误——绝不留下一个没有用户的令牌。
pub async fn login(ctx: &AuthContext, email: &str, password: &str) -> ApiResult<User> {
    let api = ctx.api();
    let token = api.login(email, password).await?;
    store_token(&token.access_token);
    match api.current_user().await {
        Ok(user) => {
            ctx.set_state.update(|s| s.user = Some(user.clone()));
            Ok(user)
        }
        Err(e) => {
            clear_token();
            Err(e)
        }
    }
}

/// 注册新账号
///
/// 固定契约：注册从不自动建立会话。需要自动登录的调用方
/// 自行在成功后串联 [`login`]。
pub async fn register(ctx: &AuthContext, req: &RegisterRequest) -> ApiResult<User> {
    ctx.api().register(req).await
}

/// 登出：移除令牌并清空用户
pub fn logout(ctx: &AuthContext) {
    clear_token();
    ctx.set_state.update(|s| s.user = None);
}

/// localStorage 中保存的令牌（如有）。API 客户端用它构造认证头。
pub(crate) fn stored_token() -> Option<String> {
    LocalStorage::get(STORAGE_TOKEN_KEY).ok()
}

fn store_token(token: &str) {
    if LocalStorage::set(STORAGE_TOKEN_KEY, token).is_err() {
        warn!("no se pudo guardar el token en localStorage");
    }
}

fn clear_token() {
    LocalStorage::delete(STORAGE_TOKEN_KEY);
}
