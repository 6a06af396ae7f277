//! Linear descending quality search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;

use super::{Budget, CompressConfig};
use crate::decode::SourceImage;
use crate::encode::{EncodeError, EncodedResult, QualityEncoder};

/// Failure of a cancellable compression run.
#[derive(Debug, Error)]
pub enum CompressError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Compression was cancelled")]
    Cancelled,
}

/// Cooperative cancellation handle.
///
/// Clones share the same flag. The compressor checks it before each encode
/// attempt; an attempt already in progress always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The winning attempt of a search, plus how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionOutcome {
    /// The returned encoding. Its quality is always one that was attempted.
    pub result: EncodedResult,
    /// Number of encode attempts made, including the winning one.
    pub attempts: usize,
    /// False when the floor attempt was returned despite exceeding the budget.
    pub within_budget: bool,
}

/// Re-encode `source` at the highest scheduled quality that fits `budget`.
///
/// Qualities are tried from `config.initial_quality()` downwards. The first
/// result with `size <= budget` is returned. If none fits, the attempt at the
/// floor quality is returned anyway: an unreachable budget is not an error.
///
/// # Errors
///
/// Any encoder failure aborts the search immediately and is returned as is.
pub fn compress<E: QualityEncoder + ?Sized>(
    encoder: &E,
    source: &SourceImage,
    budget: Budget,
    config: &CompressConfig,
) -> Result<EncodedResult, EncodeError> {
    compress_detailed(encoder, source, budget, config).map(|outcome| outcome.result)
}

/// Same as [`compress`], also reporting attempt count and budget fit.
pub fn compress_detailed<E: QualityEncoder + ?Sized>(
    encoder: &E,
    source: &SourceImage,
    budget: Budget,
    config: &CompressConfig,
) -> Result<CompressionOutcome, EncodeError> {
    search(encoder, source, budget, config, || Ok(()))
}

/// Same as [`compress_detailed`], checking `cancel` before every attempt.
pub fn compress_with_cancel<E: QualityEncoder + ?Sized>(
    encoder: &E,
    source: &SourceImage,
    budget: Budget,
    config: &CompressConfig,
    cancel: &CancelFlag,
) -> Result<CompressionOutcome, CompressError> {
    search(encoder, source, budget, config, || {
        if cancel.is_cancelled() {
            Err(CompressError::Cancelled)
        } else {
            Ok(())
        }
    })
}

fn search<E, Err>(
    encoder: &E,
    source: &SourceImage,
    budget: Budget,
    config: &CompressConfig,
    mut before_attempt: impl FnMut() -> Result<(), Err>,
) -> Result<CompressionOutcome, Err>
where
    E: QualityEncoder + ?Sized,
    Err: From<EncodeError>,
{
    let floor = config.floor_quality();
    let mut attempts = 0;

    // The schedule always ends at the floor, so the loop returns on its last
    // element at the latest.
    for quality in config.qualities() {
        before_attempt()?;
        attempts += 1;

        let result = encoder.encode_at(source, quality)?;
        let size = result.size();
        let fits = budget.admits(size);
        debug!(
            "attempt {attempts}: quality {quality} -> {size} bytes (budget {})",
            budget.bytes()
        );

        if fits || quality <= floor {
            if fits {
                info!("quality {quality} fits the budget after {attempts} attempt(s)");
            } else {
                warn!(
                    "floor quality {quality} still exceeds budget ({size} > {} bytes)",
                    budget.bytes()
                );
            }
            return Ok(CompressionOutcome {
                result,
                attempts,
                within_budget: fits,
            });
        }
        // `result` is dropped here, before the next attempt allocates.
    }

    // Unreachable for a valid schedule; surfaced as an encoder failure rather
    // than a panic.
    Err(EncodeError::EncodingFailed("quality schedule was empty".to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaType;
    use crate::quality::QualityLevel;
    use std::cell::RefCell;

    const MB: f64 = 1024.0 * 1024.0;

    /// Encoder returning pre-scripted sizes and recording requested qualities.
    ///
    /// Sizes are consumed in order; the last size repeats if the script runs
    /// out. `fail_at` makes the n-th call (1-based) fail.
    struct ScriptedEncoder {
        sizes: Vec<usize>,
        fail_at: Option<usize>,
        calls: RefCell<Vec<QualityLevel>>,
    }

    impl ScriptedEncoder {
        fn new(sizes: Vec<usize>) -> Self {
            Self {
                sizes,
                fail_at: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing_at(mut self, call: usize) -> Self {
            self.fail_at = Some(call);
            self
        }

        fn hundredths(&self) -> Vec<u8> {
            self.calls.borrow().iter().map(|q| q.hundredths()).collect()
        }
    }

    impl QualityEncoder for ScriptedEncoder {
        fn encode_at(
            &self,
            _source: &SourceImage,
            quality: QualityLevel,
        ) -> Result<EncodedResult, EncodeError> {
            let mut calls = self.calls.borrow_mut();
            calls.push(quality);
            let call = calls.len();
            if self.fail_at == Some(call) {
                return Err(EncodeError::EncodingFailed(format!("scripted failure {call}")));
            }
            let size = self
                .sizes
                .get(call - 1)
                .or(self.sizes.last())
                .copied()
                .unwrap_or(0);
            Ok(EncodedResult::new(vec![0u8; size], quality, MediaType::Jpeg))
        }

        fn media_type(&self) -> MediaType {
            MediaType::Jpeg
        }
    }

    fn source() -> SourceImage {
        SourceImage::new(2, 2, vec![0u8; 12])
    }

    fn mb(value: f64) -> usize {
        (value * MB) as usize
    }

    #[test]
    fn test_first_attempt_fits() {
        let encoder = ScriptedEncoder::new(vec![1000]);
        let outcome =
            compress_detailed(&encoder, &source(), Budget::DEFAULT, &CompressConfig::default())
                .unwrap();

        assert_eq!(encoder.hundredths(), vec![90]);
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.within_budget);
        assert_eq!(outcome.result.quality().hundredths(), 90);
    }

    #[test]
    fn test_budget_equal_to_size_fits() {
        let encoder = ScriptedEncoder::new(vec![2_097_152]);
        let result =
            compress(&encoder, &source(), Budget::DEFAULT, &CompressConfig::default()).unwrap();
        assert_eq!(result.size(), 2_097_152);
        assert_eq!(encoder.hundredths(), vec![90]);
    }

    #[test]
    fn test_reference_scenario_stops_at_0_6() {
        let encoder = ScriptedEncoder::new(vec![mb(3.0), mb(2.5), mb(2.1), mb(1.9)]);
        let outcome =
            compress_detailed(&encoder, &source(), Budget::DEFAULT, &CompressConfig::default())
                .unwrap();

        assert_eq!(encoder.hundredths(), vec![90, 80, 70, 60]);
        assert_eq!(outcome.attempts, 4);
        assert_eq!(outcome.result.quality().hundredths(), 60);
        assert_eq!(outcome.result.size(), mb(1.9));
        assert!(outcome.within_budget);
    }

    #[test]
    fn test_unreachable_budget_returns_floor_result() {
        let encoder = ScriptedEncoder::new(vec![mb(5.0)]);
        let outcome =
            compress_detailed(&encoder, &source(), Budget::DEFAULT, &CompressConfig::default())
                .unwrap();

        assert_eq!(
            encoder.hundredths(),
            vec![90, 80, 70, 60, 50, 40, 30, 20, 10]
        );
        assert_eq!(outcome.attempts, 9);
        assert_eq!(outcome.result.quality().hundredths(), 10);
        assert!(outcome.result.size() > Budget::DEFAULT.bytes());
        assert!(!outcome.within_budget);
    }

    #[test]
    fn test_fits_exactly_at_floor() {
        let mut sizes = vec![mb(4.0); 8];
        sizes.push(mb(1.0));
        let encoder = ScriptedEncoder::new(sizes);
        let outcome =
            compress_detailed(&encoder, &source(), Budget::DEFAULT, &CompressConfig::default())
                .unwrap();

        assert_eq!(outcome.attempts, 9);
        assert!(outcome.within_budget);
        assert_eq!(outcome.result.quality().hundredths(), 10);
    }

    #[test]
    fn test_encoder_failure_aborts_immediately() {
        let encoder = ScriptedEncoder::new(vec![mb(3.0)]).failing_at(3);
        let result = compress(&encoder, &source(), Budget::DEFAULT, &CompressConfig::default());

        assert!(matches!(result, Err(EncodeError::EncodingFailed(_))));
        assert_eq!(encoder.hundredths(), vec![90, 80, 70]);
    }

    #[test]
    fn test_encoder_failure_on_first_attempt() {
        let encoder = ScriptedEncoder::new(vec![10]).failing_at(1);
        let result = compress(&encoder, &source(), Budget::DEFAULT, &CompressConfig::default());

        assert!(result.is_err());
        assert_eq!(encoder.hundredths().len(), 1);
    }

    #[test]
    fn test_custom_budget_and_schedule() {
        let config = CompressConfig::new(0.8, 0.2, 0.2).unwrap();
        let budget = Budget::new(500).unwrap();
        let encoder = ScriptedEncoder::new(vec![900, 700, 450]);
        let result = compress(&encoder, &source(), budget, &config).unwrap();

        assert_eq!(encoder.hundredths(), vec![80, 60, 40]);
        assert_eq!(result.quality().hundredths(), 40);
        assert_eq!(result.size(), 450);
    }

    #[test]
    fn test_works_through_trait_object() {
        let encoder = ScriptedEncoder::new(vec![10]);
        let dyn_encoder: &dyn QualityEncoder = &encoder;
        let result =
            compress(dyn_encoder, &source(), Budget::DEFAULT, &CompressConfig::default()).unwrap();
        assert_eq!(result.size(), 10);
    }

    #[test]
    fn test_cancel_before_first_attempt() {
        let encoder = ScriptedEncoder::new(vec![10]);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let result = compress_with_cancel(
            &encoder,
            &source(),
            Budget::DEFAULT,
            &CompressConfig::default(),
            &cancel,
        );
        assert!(matches!(result, Err(CompressError::Cancelled)));
        assert!(encoder.hundredths().is_empty());
    }

    #[test]
    fn test_cancel_between_attempts() {
        /// Cancels the shared flag once the given number of calls is reached.
        struct CancellingEncoder {
            inner: ScriptedEncoder,
            cancel: CancelFlag,
            after: usize,
        }

        impl QualityEncoder for CancellingEncoder {
            fn encode_at(
                &self,
                source: &SourceImage,
                quality: QualityLevel,
            ) -> Result<EncodedResult, EncodeError> {
                let result = self.inner.encode_at(source, quality);
                if self.inner.calls.borrow().len() >= self.after {
                    self.cancel.cancel();
                }
                result
            }

            fn media_type(&self) -> MediaType {
                MediaType::Jpeg
            }
        }

        let cancel = CancelFlag::new();
        let encoder = CancellingEncoder {
            inner: ScriptedEncoder::new(vec![mb(9.0)]),
            cancel: cancel.clone(),
            after: 2,
        };

        let result = compress_with_cancel(
            &encoder,
            &source(),
            Budget::DEFAULT,
            &CompressConfig::default(),
            &cancel,
        );
        assert!(matches!(result, Err(CompressError::Cancelled)));
        assert_eq!(encoder.inner.hundredths(), vec![90, 80]);
    }

    #[test]
    fn test_uncancelled_flag_behaves_like_compress() {
        let encoder = ScriptedEncoder::new(vec![mb(3.0), mb(1.0)]);
        let outcome = compress_with_cancel(
            &encoder,
            &source(),
            Budget::DEFAULT,
            &CompressConfig::default(),
            &CancelFlag::new(),
        )
        .unwrap();
        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.result.quality().hundredths(), 80);
    }

    #[test]
    fn test_cancellable_propagates_encode_error() {
        let encoder = ScriptedEncoder::new(vec![mb(3.0)]).failing_at(2);
        let result = compress_with_cancel(
            &encoder,
            &source(),
            Budget::DEFAULT,
            &CompressConfig::default(),
            &CancelFlag::new(),
        );
        assert!(matches!(result, Err(CompressError::Encode(_))));
    }

    #[test]
    fn test_real_jpeg_encoder_shrinks_noise_under_small_budget() {
        use crate::encode::JpegQualityEncoder;

        // Pseudo-random noise compresses poorly, so high qualities are large.
        let (width, height) = (128u32, 128u32);
        let mut state = 0x1234_5678u32;
        let pixels: Vec<u8> = (0..width * height * 3)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect();
        let source = SourceImage::new(width, height, pixels);
        let config = CompressConfig::default();

        let first = JpegQualityEncoder
            .encode_at(&source, config.initial_quality())
            .unwrap();
        let budget = Budget::new(first.size() / 2).unwrap();

        let outcome = compress_detailed(&JpegQualityEncoder, &source, budget, &config).unwrap();
        assert!(outcome.attempts > 1);
        assert!(outcome.result.quality() < config.initial_quality());
        if outcome.within_budget {
            assert!(outcome.result.size() <= budget.bytes());
        } else {
            assert_eq!(outcome.result.quality(), config.floor_quality());
        }
    }

    #[test]
    fn test_real_jpeg_encoder_failure_propagates() {
        use crate::encode::JpegQualityEncoder;

        let bad = SourceImage::new(4, 4, vec![0u8; 5]);
        let result = compress(&JpegQualityEncoder, &bad, Budget::DEFAULT, &CompressConfig::default());
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_types_are_send_and_sync() {
        assert_send_sync::<crate::encode::JpegQualityEncoder>();
        assert_send_sync::<CompressConfig>();
        assert_send_sync::<Budget>();
        assert_send_sync::<CancelFlag>();
        assert_send_sync::<SourceImage>();
        assert_send_sync::<CompressionOutcome>();
    }

    #[test]
    fn test_independent_requests_run_concurrently() {
        use crate::encode::JpegQualityEncoder;

        let gradient = |width: u32, height: u32| {
            let pixels: Vec<u8> = (0..width * height * 3)
                .map(|i| ((i * 7) % 256) as u8)
                .collect();
            SourceImage::new(width, height, pixels)
        };
        let sources = [gradient(64, 48), gradient(40, 40)];
        let budget = Budget::new(1_500).unwrap();
        let config = CompressConfig::default();

        let sequential: Vec<_> = sources
            .iter()
            .map(|source| {
                compress_detailed(&JpegQualityEncoder, source, budget, &config).unwrap()
            })
            .collect();

        let (encoder, config) = (&JpegQualityEncoder, &config);
        let concurrent: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|source| {
                    scope.spawn(move || compress_detailed(encoder, source, budget, config))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap().unwrap())
                .collect()
        });

        assert_eq!(concurrent, sequential);
    }
}
