//! Interception points around SDK init and every request.

use crate::error::{FxError, SdkError};
use crate::security::SecuritySource;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use std::ops::Deref;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct HookContext {
    pub operation_id: &'static str,
    pub oauth2_scopes: &'static [&'static str],
    pub security_source: Option<SecuritySource>,
}

macro_rules! hook_context {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Clone, Debug)]
            pub struct $name(HookContext);

            impl $name {
                #[inline]
                pub fn new(ctx: HookContext) -> Self {
                    Self(ctx)
                }
            }

            impl Deref for $name {
                type Target = HookContext;
                #[inline]
                fn deref(&self) -> &HookContext {
                    &self.0
                }
            }
        )*
    };
}

hook_context!(BeforeRequestContext, AfterSuccessContext, AfterErrorContext);

pub trait SdkInitHook: Send + Sync {
    fn sdk_init(&self, base_url: String, transport: Arc<dyn Transport>) -> (String, Arc<dyn Transport>);
}

pub trait BeforeRequestHook: Send + Sync {
    fn before_request(
        &self,
        ctx: &BeforeRequestContext,
        request: HttpRequest,
    ) -> Result<HttpRequest, FxError>;
}

pub trait AfterSuccessHook: Send + Sync {
    fn after_success(
        &self,
        ctx: &AfterSuccessContext,
        response: HttpResponse,
    ) -> Result<HttpResponse, FxError>;
}

pub trait AfterErrorHook: Send + Sync {
    /// Gets the failed response or the transport error; returns what the
    /// caller should see instead.
    fn after_error(
        &self,
        ctx: &AfterErrorContext,
        response: Option<HttpResponse>,
        error: Option<SdkError>,
    ) -> Result<(Option<HttpResponse>, Option<SdkError>), FxError>;
}

impl<F> SdkInitHook for F
where
    F: Fn(String, Arc<dyn Transport>) -> (String, Arc<dyn Transport>) + Send + Sync,
{
    fn sdk_init(&self, base_url: String, transport: Arc<dyn Transport>) -> (String, Arc<dyn Transport>) {
        self(base_url, transport)
    }
}

impl<F> BeforeRequestHook for F
where
    F: Fn(&BeforeRequestContext, HttpRequest) -> Result<HttpRequest, FxError> + Send + Sync,
{
    fn before_request(
        &self,
        ctx: &BeforeRequestContext,
        request: HttpRequest,
    ) -> Result<HttpRequest, FxError> {
        self(ctx, request)
    }
}

impl<F> AfterSuccessHook for F
where
    F: Fn(&AfterSuccessContext, HttpResponse) -> Result<HttpResponse, FxError> + Send + Sync,
{
    fn after_success(
        &self,
        ctx: &AfterSuccessContext,
        response: HttpResponse,
    ) -> Result<HttpResponse, FxError> {
        self(ctx, response)
    }
}

impl<F> AfterErrorHook for F
where
    F: Fn(
            &AfterErrorContext,
            Option<HttpResponse>,
            Option<SdkError>,
        ) -> Result<(Option<HttpResponse>, Option<SdkError>), FxError>
        + Send
        + Sync,
{
    fn after_error(
        &self,
        ctx: &AfterErrorContext,
        response: Option<HttpResponse>,
        error: Option<SdkError>,
    ) -> Result<(Option<HttpResponse>, Option<SdkError>), FxError> {
        self(ctx, response, error)
    }
}

/// Registration surface handed to SDK-level hook setup.
pub trait Hooks {
    fn register_sdk_init_hook(&mut self, hook: Arc<dyn SdkInitHook>);
    fn register_before_request_hook(&mut self, hook: Arc<dyn BeforeRequestHook>);
    fn register_after_success_hook(&mut self, hook: Arc<dyn AfterSuccessHook>);
    fn register_after_error_hook(&mut self, hook: Arc<dyn AfterErrorHook>);
}

/// Ordered hook chains. Each hook receives the previous hook's output; the
/// first error stops the chain.
#[derive(Clone, Default)]
pub struct SdkHooks {
    sdk_init: Vec<Arc<dyn SdkInitHook>>,
    before_request: Vec<Arc<dyn BeforeRequestHook>>,
    after_success: Vec<Arc<dyn AfterSuccessHook>>,
    after_error: Vec<Arc<dyn AfterErrorHook>>,
}

impl Hooks for SdkHooks {
    fn register_sdk_init_hook(&mut self, hook: Arc<dyn SdkInitHook>) {
        self.sdk_init.push(hook);
    }

    fn register_before_request_hook(&mut self, hook: Arc<dyn BeforeRequestHook>) {
        self.before_request.push(hook);
    }

    fn register_after_success_hook(&mut self, hook: Arc<dyn AfterSuccessHook>) {
        self.after_success.push(hook);
    }

    fn register_after_error_hook(&mut self, hook: Arc<dyn AfterErrorHook>) {
        self.after_error.push(hook);
    }
}

impl SdkHooks {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sdk_init.is_empty()
            && self.before_request.is_empty()
            && self.after_success.is_empty()
            && self.after_error.is_empty()
    }

    pub fn sdk_init(
        &self,
        base_url: String,
        transport: Arc<dyn Transport>,
    ) -> (String, Arc<dyn Transport>) {
        self.sdk_init
            .iter()
            .fold((base_url, transport), |(url, t), hook| hook.sdk_init(url, t))
    }

    pub fn before_request(
        &self,
        ctx: &BeforeRequestContext,
        mut request: HttpRequest,
    ) -> Result<HttpRequest, SdkError> {
        for hook in &self.before_request {
            request = hook.before_request(ctx, request).map_err(SdkError::Hook)?;
        }
        Ok(request)
    }

    pub fn after_success(
        &self,
        ctx: &AfterSuccessContext,
        mut response: HttpResponse,
    ) -> Result<HttpResponse, SdkError> {
        for hook in &self.after_success {
            response = hook.after_success(ctx, response).map_err(SdkError::Hook)?;
        }
        Ok(response)
    }

    pub fn after_error(
        &self,
        ctx: &AfterErrorContext,
        mut response: Option<HttpResponse>,
        mut error: Option<SdkError>,
    ) -> Result<(Option<HttpResponse>, Option<SdkError>), SdkError> {
        for hook in &self.after_error {
            (response, error) = hook
                .after_error(ctx, response, error)
                .map_err(SdkError::Hook)?;
        }
        Ok((response, error))
    }
}
