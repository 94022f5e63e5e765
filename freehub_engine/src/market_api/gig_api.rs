use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::{GigDeletion, GigManagement, UserManagement},
    db_types::{Gig, GigCategory, GigChanges, GigId, GigStatus, GigUpdate, NewGig, Price, UserId, UserProfile},
    market_api::errors::MarketError,
};

/// The cheapest a gig may be listed for, in cents.
pub const MIN_GIG_PRICE: Price = Price::new(500);

pub struct GigApi<B> {
    db: B,
}

impl<B> Debug for GigApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GigApi")
    }
}

impl<B> GigApi<B>
where B: GigManagement + UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Lists a new gig for `owner`. New gigs are active straight away.
    pub async fn create_gig(&self, owner: &UserProfile, mut gig: NewGig) -> Result<Gig, MarketError> {
        gig.created_by = owner.id;
        validate_new_gig(&gig)?;
        self.db.upsert_user(owner).await?;
        let gig = self.db.insert_gig(gig).await?;
        info!("💼️ Gig {} '{}' listed by {}", gig.id, gig.title, owner.id);
        Ok(gig)
    }

    /// Fetches a gig for public display. Every call counts as one view.
    pub async fn public_gig(&self, id: GigId) -> Result<Gig, MarketError> {
        self.db.increment_gig_views(id).await?.ok_or_else(gig_not_found)
    }

    pub async fn gigs_for_owner(&self, owner: UserId) -> Result<Vec<Gig>, MarketError> {
        let gigs = self.db.fetch_gigs_for_owner(owner).await?;
        Ok(gigs)
    }

    /// Every active gig, newest first.
    pub async fn active_gigs(&self) -> Result<Vec<Gig>, MarketError> {
        let gigs = self.db.fetch_gigs_with_status(GigStatus::Active).await?;
        trace!("💼️ {} active gigs", gigs.len());
        Ok(gigs)
    }

    /// Applies the owner's edits to the gig. The edited listing must pass the same checks as a new one.
    pub async fn update_gig(&self, actor: UserId, id: GigId, changes: GigChanges) -> Result<Gig, MarketError> {
        let gig = self.owned_gig(actor, id, "Unauthorized to update this gig").await?;
        let update = changes.apply_to(&gig);
        validate_gig_update(&update)?;
        let gig = self.db.update_gig(id, update).await?.ok_or_else(gig_not_found)?;
        info!("💼️ Gig {id} '{}' updated by {actor}", gig.title);
        Ok(gig)
    }

    pub async fn update_gig_status(&self, actor: UserId, id: GigId, status: GigStatus) -> Result<Gig, MarketError> {
        self.owned_gig(actor, id, "Unauthorized to update this gig").await?;
        let gig = self.db.update_gig_status(id, status).await?.ok_or_else(gig_not_found)?;
        info!("💼️ Gig {id} is now {status}");
        Ok(gig)
    }

    /// Deletes the gig and its reviews, and returns the gig as it was. Gigs that have been ordered cannot be deleted.
    pub async fn delete_gig(&self, actor: UserId, id: GigId) -> Result<Gig, MarketError> {
        let gig = self.owned_gig(actor, id, "Unauthorized to delete this gig").await?;
        match self.db.delete_gig(id).await? {
            GigDeletion::Deleted => {
                info!("💼️ Gig {id} '{}' deleted by {actor}", gig.title);
                Ok(gig)
            },
            GigDeletion::HasOrders => Err(MarketError::InvalidState("Gigs that have orders cannot be deleted".into())),
            GigDeletion::NotFound => Err(gig_not_found()),
        }
    }

    pub fn categories(&self) -> &'static [GigCategory] {
        &GigCategory::ALL
    }

    async fn owned_gig(&self, actor: UserId, id: GigId, refusal: &str) -> Result<Gig, MarketError> {
        let gig = self.db.fetch_gig(id).await?.ok_or_else(gig_not_found)?;
        if gig.created_by != Some(actor) {
            return Err(MarketError::Forbidden(refusal.to_string()));
        }
        Ok(gig)
    }
}

fn gig_not_found() -> MarketError {
    MarketError::NotFound("Gig not found".into())
}

pub fn validate_new_gig(gig: &NewGig) -> Result<(), MarketError> {
    validate_listing(&gig.title, &gig.description, gig.price, gig.delivery_time, &gig.images)
}

pub fn validate_gig_update(gig: &GigUpdate) -> Result<(), MarketError> {
    validate_listing(&gig.title, &gig.description, gig.price, gig.delivery_time, &gig.images)
}

fn validate_listing(
    title: &str,
    description: &str,
    price: Price,
    delivery_time: i64,
    images: &[String],
) -> Result<(), MarketError> {
    if title.trim().is_empty() {
        return Err(MarketError::InvalidInput("Title is required".into()));
    }
    if description.trim().is_empty() {
        return Err(MarketError::InvalidInput("Description is required".into()));
    }
    if price < MIN_GIG_PRICE {
        return Err(MarketError::InvalidInput(format!("Price must be at least {MIN_GIG_PRICE}")));
    }
    if delivery_time < 1 {
        return Err(MarketError::InvalidInput("Delivery time must be at least 1 day".into()));
    }
    if images.is_empty() || images.iter().any(|i| i.trim().is_empty()) {
        return Err(MarketError::InvalidInput("At least one image is required".into()));
    }
    Ok(())
}
