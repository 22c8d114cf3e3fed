use super::repository::ProductProfileStore;
use contracts::domain::a001_product_profile::{ProductProfile, ProductProfileDto};
use uuid::Uuid;

pub async fn create(
    store: &dyn ProductProfileStore,
    dto: ProductProfileDto,
) -> anyhow::Result<ProductProfile> {
    if store.get_by_model(dto.model.trim()).await?.is_some() {
        anyhow::bail!("Modelo '{}' já cadastrado", dto.model.trim());
    }

    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("PRF-{}", Uuid::new_v4()));

    let mut aggregate = ProductProfile::new_for_insert(
        code,
        dto.description,
        dto.model.trim().to_string(),
        dto.empty_weight_g,
        dto.full_weight_g,
        dto.sheet_capacity,
        dto.price_per_sheet,
        dto.comment,
    );

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    store.create(aggregate).await
}

pub async fn list_all(store: &dyn ProductProfileStore) -> anyhow::Result<Vec<ProductProfile>> {
    store.list().await
}

pub async fn get_by_model(
    store: &dyn ProductProfileStore,
    model: &str,
) -> anyhow::Result<Option<ProductProfile>> {
    store.get_by_model(model.trim()).await
}

pub async fn delete(store: &dyn ProductProfileStore, id: Uuid) -> anyhow::Result<bool> {
    store.delete(id).await
}
