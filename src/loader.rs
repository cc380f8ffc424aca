//! Asynchronous asset loading.
//!
//! A [`Fetch`] implementation turns a relative path into bytes: over HTTP in
//! the browser, from the file system natively. [`Loader`] builds shaders,
//! programs and textures on top of it.

use anyhow::{Context as _, Result};
use futures::future::{try_join, try_join_all, LocalBoxFuture};
use log::debug;

use crate::backend::GlBackend;
use crate::context::Context;
use crate::program::Program;
use crate::shader::{Shader, ShaderKind};
use crate::texture::{Texture, TextureParams};

/// Source of raw asset bytes.
pub trait Fetch {
    fn fetch<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>>>;
}

/// Reads assets relative to a root directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileFetch {
    root: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileFetch {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Fetch for FileFetch {
    fn fetch<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            let full = self.root.join(path);
            std::fs::read(&full).with_context(|| format!("failed to read {}", full.display()))
        })
    }
}

/// Fetches assets with HTTP GET relative to a base URL.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct HttpFetch {
    base: reqwest::Url,
}

#[cfg(target_arch = "wasm32")]
impl HttpFetch {
    pub fn new(base: &str) -> Result<Self> {
        let mut base = base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = reqwest::Url::parse(&base).with_context(|| format!("invalid base url {base}"))?;
        Ok(Self { base })
    }

    /// Resolves against `<page origin>/<dir>/`.
    pub fn from_origin(dir: &str) -> Result<Self> {
        let window = web_sys::window().context("window not available")?;
        let origin = window
            .location()
            .origin()
            .map_err(|err| anyhow::anyhow!("page origin unavailable: {err:?}"))?;
        Self::new(&format!("{origin}/{dir}"))
    }

    pub fn base(&self) -> &reqwest::Url {
        &self.base
    }
}

#[cfg(target_arch = "wasm32")]
impl Fetch for HttpFetch {
    fn fetch<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            let url = self
                .base
                .join(path)
                .with_context(|| format!("invalid asset path {path}"))?;
            let response = reqwest::get(url.clone())
                .await
                .with_context(|| format!("request for {url} failed"))?
                .error_for_status()
                .with_context(|| format!("request for {url} failed"))?;
            let bytes = response
                .bytes()
                .await
                .with_context(|| format!("failed to read body of {url}"))?;
            Ok(bytes.to_vec())
        })
    }
}

/// Drives a load on the browser's event loop. Failures are logged rather
/// than returned, since nothing awaits the result.
#[cfg(target_arch = "wasm32")]
pub fn spawn_load<Fut>(load: Fut)
where
    Fut: std::future::Future<Output = Result<()>> + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = load.await {
            log::error!("asset load failed: {err:?}");
        }
    });
}

/// Loads assets through a [`Fetch`] and turns them into GL objects.
#[derive(Debug, Clone)]
pub struct Loader<F> {
    fetch: F,
}

impl<F: Fetch> Loader<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetch
    }

    pub async fn bytes(&self, path: &str) -> Result<Vec<u8>> {
        debug!("loading {path}");
        self.fetch.fetch(path).await
    }

    pub async fn text(&self, path: &str) -> Result<String> {
        let bytes = self.bytes(path).await?;
        String::from_utf8(bytes).with_context(|| format!("{path} is not valid UTF-8"))
    }

    /// Fetches every path concurrently; fails on the first error.
    pub async fn all(&self, paths: &[&str]) -> Result<Vec<Vec<u8>>> {
        try_join_all(paths.iter().map(|path| self.bytes(path))).await
    }

    pub async fn shader<B: GlBackend>(
        &self,
        ctx: &Context<B>,
        kind: ShaderKind,
        path: &str,
    ) -> Result<Shader<B>> {
        let source = self.text(path).await?;
        Shader::compile(ctx, kind, &source).with_context(|| format!("shader {path}"))
    }

    /// Fetches both sources concurrently, then compiles and links them.
    pub async fn program<B: GlBackend>(
        &self,
        ctx: &Context<B>,
        vertex_path: &str,
        fragment_path: &str,
        bindings: &[(u32, &str)],
    ) -> Result<Program<B>> {
        let (vertex, fragment) =
            try_join(self.text(vertex_path), self.text(fragment_path)).await?;
        Program::from_sources(ctx, &vertex, &fragment, bindings)
            .with_context(|| format!("program {vertex_path} + {fragment_path}"))
    }

    /// Fetches and decodes an image, then uploads it as a 2D texture.
    pub async fn texture<B: GlBackend>(
        &self,
        ctx: &Context<B>,
        path: &str,
        params: &TextureParams,
    ) -> Result<Texture<B>> {
        let bytes = self.bytes(path).await?;
        let image =
            image::load_from_memory(&bytes).with_context(|| format!("failed to decode {path}"))?;
        Texture::from_image(ctx, &image, params).with_context(|| format!("texture {path}"))
    }
}
