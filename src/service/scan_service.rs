//! Scan record lifecycle: classification-backed create, authorized
//! update/delete, and filtered listing with derived pricing.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{AuthUser, ScanFilter};
use crate::error::AppError;
use crate::persistence::models::ScanRecordRow;
use crate::persistence::{LotStore, ScanStore};
use crate::service::lot_service::recompute_lot_totals;
use crate::vision::{BoardClassifier, clamp_confidence};

/// Input for creating a scan record.
///
/// `total_price` has no counterpart here on purpose: it is always derived
/// server-side from `weight_kg * price_per_kg`.
#[derive(Debug, Clone)]
pub struct NewScan {
    /// Base64-encoded board photograph for the vision collaborator.
    pub image_b64: String,
    /// Capture latitude.
    pub latitude: Option<f64>,
    /// Capture longitude.
    pub longitude: Option<f64>,
    /// Measured weight in kilograms.
    pub weight_kg: Option<f64>,
    /// Price per kilogram.
    pub price_per_kg: Option<f64>,
}

/// Partial update for a scan record; absent fields keep stored values.
#[derive(Debug, Clone, Default)]
pub struct ScanPatch {
    /// Replacement board type.
    pub board_type: Option<String>,
    /// Replacement category.
    pub category: Option<String>,
    /// Replacement device type.
    pub device_type: Option<String>,
    /// Replacement manufacturer.
    pub manufacturer: Option<String>,
    /// Replacement model.
    pub model: Option<String>,
    /// Replacement weight.
    pub weight_kg: Option<f64>,
    /// Replacement price per kilogram.
    pub price_per_kg: Option<f64>,
}

/// Derives the stored total price from the effective inputs.
///
/// Present only when both inputs are present.
fn derive_total_price(weight_kg: Option<f64>, price_per_kg: Option<f64>) -> Option<f64> {
    match (weight_kg, price_per_kg) {
        (Some(weight), Some(price)) => Some(weight * price),
        _ => None,
    }
}

/// Orchestration layer for scan records.
///
/// Create calls the vision collaborator first and persists nothing when
/// it fails; update/get/delete enforce creator-or-admin access; listing
/// always restricts non-admin callers to their own records.
#[derive(Debug, Clone)]
pub struct ScanService<S, C> {
    store: Arc<S>,
    classifier: Arc<C>,
}

impl<S, C> ScanService<S, C>
where
    S: ScanStore + LotStore,
    C: BoardClassifier,
{
    /// Creates a new `ScanService`.
    #[must_use]
    pub fn new(store: Arc<S>, classifier: Arc<C>) -> Self {
        Self { store, classifier }
    }

    /// Classifies the image and persists the resulting record.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] for an empty image or negative
    /// weight/price, [`AppError::Upstream`] when classification fails (in
    /// which case no record is persisted).
    pub async fn create(&self, auth: &AuthUser, input: NewScan) -> Result<ScanRecordRow, AppError> {
        if input.image_b64.trim().is_empty() {
            return Err(AppError::Validation("image payload must not be empty".into()));
        }
        for (label, value) in [("weight_kg", input.weight_kg), ("price_per_kg", input.price_per_kg)]
        {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(AppError::Validation(format!(
                    "{label} must be a non-negative number"
                )));
            }
        }

        // Upstream failure aborts the whole operation; nothing below runs.
        let classification = self.classifier.classify(&input.image_b64).await?;

        let now = Utc::now();
        let row = ScanRecordRow {
            id: Uuid::new_v4(),
            user_id: auth.id,
            lot_id: None,
            board_type: classification.board_type,
            category: classification.category,
            device_type: classification.device_type,
            manufacturer: classification.manufacturer,
            model: classification.model,
            confidence: clamp_confidence(classification.confidence),
            description: (!classification.description.is_empty())
                .then_some(classification.description),
            latitude: input.latitude,
            longitude: input.longitude,
            weight_kg: input.weight_kg,
            price_per_kg: input.price_per_kg,
            total_price: derive_total_price(input.weight_kg, input.price_per_kg),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_scan(&row).await?;
        tracing::info!(scan_id = %row.id, board_type = %row.board_type, "scan recorded");
        Ok(row)
    }

    /// Fetches a single record, creator-or-admin only.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when absent, [`AppError::Forbidden`] for
    /// other users' records.
    pub async fn get(&self, auth: &AuthUser, id: Uuid) -> Result<ScanRecordRow, AppError> {
        let row = self
            .store
            .scan_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("scan record not found: {id}")))?;
        if !auth.may_access(row.user_id) {
            return Err(AppError::Forbidden("not the record owner".into()));
        }
        Ok(row)
    }

    /// Applies a partial update, re-deriving `total_price` from the
    /// effective weight/price pair.
    ///
    /// The current row is fetched first so a single-field patch combines
    /// with stored values. If the record belongs to a lot and pricing
    /// inputs changed, the lot's rollups are recomputed.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`], [`AppError::Forbidden`], or
    /// [`AppError::Validation`] for negative pricing inputs.
    pub async fn update(
        &self,
        auth: &AuthUser,
        id: Uuid,
        patch: ScanPatch,
    ) -> Result<ScanRecordRow, AppError> {
        for (label, value) in [("weight_kg", patch.weight_kg), ("price_per_kg", patch.price_per_kg)]
        {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(AppError::Validation(format!(
                    "{label} must be a non-negative number"
                )));
            }
        }

        let mut row = self.get(auth, id).await?;
        let pricing_before = (row.weight_kg, row.price_per_kg);

        if let Some(board_type) = patch.board_type {
            row.board_type = board_type;
        }
        if let Some(category) = patch.category {
            row.category = category;
        }
        if let Some(device_type) = patch.device_type {
            row.device_type = device_type;
        }
        if let Some(manufacturer) = patch.manufacturer {
            row.manufacturer = Some(manufacturer);
        }
        if let Some(model) = patch.model {
            row.model = Some(model);
        }
        if let Some(weight) = patch.weight_kg {
            row.weight_kg = Some(weight);
        }
        if let Some(price) = patch.price_per_kg {
            row.price_per_kg = Some(price);
        }

        row.total_price = derive_total_price(row.weight_kg, row.price_per_kg);
        row.updated_at = Utc::now();
        self.store.update_scan(&row).await?;

        if let Some(lot_id) = row.lot_id {
            if (row.weight_kg, row.price_per_kg) != pricing_before {
                recompute_lot_totals(self.store.as_ref(), lot_id).await?;
            }
        }

        tracing::info!(scan_id = %row.id, "scan updated");
        Ok(row)
    }

    /// Deletes a record, creator-or-admin only; the owning lot's rollups
    /// are recomputed afterwards.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] or [`AppError::Forbidden`].
    pub async fn delete(&self, auth: &AuthUser, id: Uuid) -> Result<(), AppError> {
        let row = self.get(auth, id).await?;
        self.store.delete_scan(id).await?;
        if let Some(lot_id) = row.lot_id {
            recompute_lot_totals(self.store.as_ref(), lot_id).await?;
        }
        tracing::info!(scan_id = %id, "scan deleted");
        Ok(())
    }

    /// Lists records matching the filter, newest first.
    ///
    /// Non-admin callers are always restricted to their own records,
    /// regardless of the supplied filter.
    ///
    /// # Errors
    ///
    /// Propagates persistence failures.
    pub async fn list(
        &self,
        auth: &AuthUser,
        mut filter: ScanFilter,
    ) -> Result<Vec<ScanRecordRow>, AppError> {
        if !auth.is_admin() {
            filter.user_id = Some(auth.id);
        }
        self.store.list_scans(&filter.clamped()).await
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::persistence::ScanStore;
    use crate::persistence::memory::MemStore;
    use crate::vision::Classification;

    /// Deterministic classifier for tests; fails when `fail` is set.
    #[derive(Debug)]
    struct FakeClassifier {
        fail: bool,
        confidence: f64,
    }

    impl BoardClassifier for FakeClassifier {
        async fn classify(&self, _image_b64: &str) -> Result<Classification, AppError> {
            if self.fail {
                return Err(AppError::Upstream("model unavailable".into()));
            }
            Ok(Classification {
                board_type: "phone mainboard".to_string(),
                category: "consumer".to_string(),
                device_type: "smartphone".to_string(),
                manufacturer: Some("Acme".to_string()),
                model: None,
                confidence: self.confidence,
                components: vec!["soc".to_string()],
                description: "dense multilayer board".to_string(),
            })
        }
    }

    fn service(fail: bool, confidence: f64) -> ScanService<MemStore, FakeClassifier> {
        ScanService::new(
            Arc::new(MemStore::default()),
            Arc::new(FakeClassifier { fail, confidence }),
        )
    }

    fn user() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role: Role::User,
        }
    }

    fn new_scan(weight: Option<f64>, price: Option<f64>) -> NewScan {
        NewScan {
            image_b64: "aGVsbG8=".to_string(),
            latitude: None,
            longitude: None,
            weight_kg: weight,
            price_per_kg: price,
        }
    }

    #[tokio::test]
    async fn create_derives_total_price() {
        let service = service(false, 0.9);
        let auth = user();
        let Ok(row) = service.create(&auth, new_scan(Some(1.5), Some(2.0))).await else {
            panic!("create failed");
        };
        assert_eq!(row.total_price, Some(3.0));
        assert_eq!(row.user_id, auth.id);
    }

    #[tokio::test]
    async fn create_without_both_inputs_leaves_total_unset() {
        let service = service(false, 0.9);
        let Ok(row) = service.create(&user(), new_scan(Some(1.5), None)).await else {
            panic!("create failed");
        };
        assert_eq!(row.total_price, None);
    }

    #[tokio::test]
    async fn create_clamps_confidence() {
        let service = service(false, 1.4);
        let Ok(row) = service.create(&user(), new_scan(None, None)).await else {
            panic!("create failed");
        };
        assert_eq!(row.confidence, 1.0);
    }

    #[tokio::test]
    async fn failed_classification_persists_nothing() {
        let service = service(true, 0.9);
        let result = service.create(&user(), new_scan(Some(1.0), Some(1.0))).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));

        let count = service.store.count_all().await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn update_combines_patch_with_stored_pricing() {
        let service = service(false, 0.9);
        let auth = user();
        let Ok(row) = service.create(&auth, new_scan(Some(2.0), None)).await else {
            panic!("create failed");
        };
        assert_eq!(row.total_price, None);

        // Price arrives later; weight is already stored.
        let patch = ScanPatch {
            price_per_kg: Some(3.0),
            ..ScanPatch::default()
        };
        let Ok(updated) = service.update(&auth, row.id, patch).await else {
            panic!("update failed");
        };
        assert_eq!(updated.total_price, Some(6.0));
    }

    #[tokio::test]
    async fn update_by_stranger_is_forbidden() {
        let service = service(false, 0.9);
        let owner = user();
        let Ok(row) = service.create(&owner, new_scan(None, None)).await else {
            panic!("create failed");
        };

        let stranger = user();
        let result = service
            .update(&stranger, row.id, ScanPatch::default())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn admin_may_update_any_record() {
        let service = service(false, 0.9);
        let owner = user();
        let Ok(row) = service.create(&owner, new_scan(None, None)).await else {
            panic!("create failed");
        };

        let admin = AuthUser {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let patch = ScanPatch {
            category: Some("industrial".to_string()),
            ..ScanPatch::default()
        };
        let Ok(updated) = service.update(&admin, row.id, patch).await else {
            panic!("admin update failed");
        };
        assert_eq!(updated.category, "industrial");
    }

    #[tokio::test]
    async fn non_admin_listing_restricted_to_self() {
        let service = service(false, 0.9);
        let alice = user();
        let bob = user();
        service.create(&alice, new_scan(None, None)).await.unwrap();
        service.create(&bob, new_scan(None, None)).await.unwrap();

        // Even an explicit filter for someone else's records is overridden.
        let filter = ScanFilter {
            user_id: Some(bob.id),
            ..ScanFilter::default()
        };
        let Ok(rows) = service.list(&alice, filter).await else {
            panic!("list failed");
        };
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|r| r.user_id == alice.id));
    }

    #[tokio::test]
    async fn empty_image_rejected() {
        let service = service(false, 0.9);
        let mut input = new_scan(None, None);
        input.image_b64 = "   ".to_string();
        let result = service.create(&user(), input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn negative_weight_rejected() {
        let service = service(false, 0.9);
        let result = service.create(&user(), new_scan(Some(-1.0), None)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
