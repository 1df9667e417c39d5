use tracing::{debug, info, warn};

use crate::{
    error::Error,
    gl::{ContextVersion, GlApi},
    provider::ContextProvider,
};

/// Routes a GL call library's commands through a context it did not create.
///
/// The wrapped `G` was loaded against the toolkit's context. `bind` makes that
/// context current before handing out the call surface, so every GL call made
/// through the binding targets the provider it was bound with.
#[derive(Debug)]
pub struct GlBinding<G> {
    gl: G,
    version: Option<ContextVersion>,
    bound: bool,
}

impl<G: GlApi> GlBinding<G> {
    /// Wraps `gl`; nothing is validated until the first bind.
    pub fn new(gl: G) -> Self {
        Self { gl, version: None, bound: false }
    }

    /// Activates `provider`'s context and returns the call surface for it.
    ///
    /// The first bind validates the foreign context.
    ///
    /// # Errors
    /// Returns [`Error::Context`] if activation fails, or [`Error::Binding`]
    /// if the call library does not recognize the context.
    pub fn bind(&mut self, provider: &impl ContextProvider) -> Result<&G, Error> {
        provider.make_current()?;

        if !self.bound {
            let version = self
                .gl
                .context_version()
                .ok_or_else(Error::binding_unrecognized_context)?;

            if version.major < 3 || (version.major == 3 && version.minor < 3) {
                warn!(%version, "context is older than the requested 3.3");
            }
            info!(%version, renderer = %self.gl.renderer_info(), "bound GL context");

            self.version = Some(version);
            self.bound = true;
        }

        Ok(&self.gl)
    }

    /// Call surface of the bound context, without reactivating it.
    ///
    /// # Errors
    /// Returns [`Error::Binding`] when not bound.
    pub fn gl(&self) -> Result<&G, Error> {
        if self.bound { Ok(&self.gl) } else { Err(Error::binding_released()) }
    }

    /// Releases adapter-side bookkeeping. Must run before the provider drops.
    pub fn unbind(&mut self) {
        if self.bound {
            debug!("unbinding GL context");
        }
        self.bound = false;
        self.version = None;
    }

    /// True between the first successful bind and `unbind`.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Version validated on the first bind.
    #[must_use]
    pub fn version(&self) -> Option<ContextVersion> {
        self.version
    }
}
