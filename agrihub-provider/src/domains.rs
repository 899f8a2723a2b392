//! Per-domain instantiations of the generic provider.

use crate::provider::ResourceProvider;
use agrihub_model::{DomainEntity, MediaResource, User};

pub type CropProvider = ResourceProvider<DomainEntity>;
pub type LivestockProvider = ResourceProvider<DomainEntity>;
pub type FisheryProvider = ResourceProvider<DomainEntity>;
pub type MachineProvider = ResourceProvider<DomainEntity>;
/// User management from the admin dashboard.
pub type AdminProvider = ResourceProvider<User>;
/// Videos, downloadable applications and articles.
pub type MediaProvider = ResourceProvider<MediaResource>;
