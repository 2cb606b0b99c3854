//! Referral document service — single point of access for letter generation.
//!
//! **Why this exists**: the UI offers generate, regenerate, preview and
//! download actions against one current document. This service enforces one
//! build/render at a time, owns the rendered artifact exclusively, and
//! replaces it wholesale on regenerate so stale previews can never observe a
//! half-written document.
//!
//! **Design**:
//! - `generate()` takes the exclusive render guard (`Busy` error if an
//!   operation is in flight) and replaces the owned artifact
//! - `regenerate()` re-runs generation with the stored inputs
//! - `is_busy()` provides the signal callers use to disable triggering
//!   actions while a render is pending
//! - `current()` hands out shared-bytes snapshots; dropping a snapshot
//!   releases its reference (the transient preview handle)

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};

use crate::config::ClinicInfo;
use crate::models::{DiagnosisEntry, PatientHistory, ReferralRequest};
use crate::referral::{self, ReferralError, ReferralLetter};

/// The current rendered referral artifact.
///
/// Clones share the underlying PDF bytes; each clone is a transient handle
/// that releases its reference when dropped.
#[derive(Debug, Clone)]
pub struct RenderedReferral {
    pub filename: String,
    /// Calendar date the artifact was generated (the letter's referral date).
    pub generated_on: NaiveDate,
    bytes: Arc<Vec<u8>>,
}

impl RenderedReferral {
    /// Borrow the PDF bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Inputs of the last generation, kept so regenerate reuses them verbatim.
#[derive(Clone)]
struct GenerationInputs {
    request: ReferralRequest,
    history: PatientHistory,
    entries: Vec<DiagnosisEntry>,
}

/// Owns the current referral artifact and serializes document operations.
pub struct ReferralService {
    /// Exclusive access lock — only one build/render at a time.
    /// tokio Mutex: held across the render await point.
    lock: tokio::sync::Mutex<()>,
    /// Inputs of the last successful generation.
    inputs: Mutex<Option<GenerationInputs>>,
    /// The artifact owned by this service. Replaced wholesale on regenerate.
    current: Mutex<Option<RenderedReferral>>,
    clinic: ClinicInfo,
}

impl ReferralService {
    /// Create a service rendering letters for the given clinic.
    pub fn new(clinic: ClinicInfo) -> Self {
        Self {
            lock: tokio::sync::Mutex::new(()),
            inputs: Mutex::new(None),
            current: Mutex::new(None),
            clinic,
        }
    }

    /// Is a build/render currently in flight?
    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    /// Build and render a referral, replacing any previously owned artifact.
    ///
    /// The letter is dated with the current calendar date. Rendering runs on
    /// the blocking pool; the returned snapshot shares bytes with the owned
    /// artifact.
    pub async fn generate(
        &self,
        request: ReferralRequest,
        history: PatientHistory,
        entries: Vec<DiagnosisEntry>,
    ) -> Result<RenderedReferral, ReferralError> {
        let _guard = self.lock.try_lock().map_err(|_| ReferralError::Busy)?;

        let today = Local::now().date_naive();
        let letter = ReferralLetter::build(&request, &history, &entries, &self.clinic, today);
        let filename = referral::referral_filename(&request.patient_name);

        let bytes = tokio::task::spawn_blocking(move || referral::render_pdf(&letter))
            .await
            .map_err(|e| ReferralError::Render(e.to_string()))??;

        let rendered = RenderedReferral {
            filename,
            generated_on: today,
            bytes: Arc::new(bytes),
        };

        *self.inputs.lock().map_err(|_| ReferralError::LockPoisoned)? =
            Some(GenerationInputs {
                request,
                history,
                entries,
            });
        // Wholesale replacement: outstanding snapshots keep the old bytes
        // alive until dropped, then they are freed.
        *self.current.lock().map_err(|_| ReferralError::LockPoisoned)? =
            Some(rendered.clone());

        tracing::info!(
            "Generated referral {} ({} bytes)",
            rendered.filename,
            rendered.len()
        );
        Ok(rendered)
    }

    /// Re-render with the stored inputs (fresh referral date, same content).
    pub async fn regenerate(&self) -> Result<RenderedReferral, ReferralError> {
        let inputs = self
            .inputs
            .lock()
            .map_err(|_| ReferralError::LockPoisoned)?
            .clone()
            .ok_or(ReferralError::NothingGenerated)?;
        self.generate(inputs.request, inputs.history, inputs.entries)
            .await
    }

    /// Snapshot of the owned artifact, or `None` before the first generation.
    pub fn current(&self) -> Option<RenderedReferral> {
        self.current.lock().ok()?.clone()
    }

    /// Write the owned artifact into `dir` and return the written path.
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, ReferralError> {
        let rendered = self.current().ok_or(ReferralError::NothingGenerated)?;
        referral::write_artifact(rendered.bytes(), &rendered.filename, dir)
    }

    /// Write the owned artifact into the default exports directory.
    pub fn export(&self) -> Result<PathBuf, ReferralError> {
        self.export_to(&crate::config::exports_dir())
    }
}
