use crate::MediaElement;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("real-time audio analysis is not supported by this host")]
    Unsupported,

    #[error("media source '{0}' cannot be analysed across origins")]
    CrossOrigin(String),

    #[error("failed to build analysis graph: {0}")]
    Construction(String),
}

/// Factory for real-time analysis contexts.
pub trait AnalysisBackend {
    fn open_context(&self) -> Result<Box<dyn AnalysisContext>, AnalysisError>;
}

/// A live analysis graph: media source → analyser → output.
pub trait AnalysisContext {
    /// Route `media` through an analyser with the given window size.
    ///
    /// On error the context may hold partially built nodes; the caller is
    /// expected to [`close`](AnalysisContext::close) it.
    fn attach(
        &mut self,
        media: &dyn MediaElement,
        fft_size: usize,
        smoothing: f64,
    ) -> Result<(), AnalysisError>;

    /// Copy the latest time-domain samples (128 is silence) into `buffer`.
    fn read_time_domain(&mut self, buffer: &mut [u8]);

    fn is_suspended(&self) -> bool;

    fn resume(&mut self);

    fn close(&mut self);
}
