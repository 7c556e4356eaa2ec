pub mod artist_enrichment;
pub mod artist_registration;
pub mod reconciliation;
pub mod recent_tracks;
pub mod track_registration;

pub use artist_enrichment::ArtistEnrichmentService;
pub use artist_registration::ArtistTrackRegistrationService;
pub use reconciliation::{ReconciliationConfig, ReconciliationState};
pub use recent_tracks::RecentTracksService;
pub use track_registration::{RegisterTrack, Registration, SubmittedMetadata, TrackRegistrationService};
