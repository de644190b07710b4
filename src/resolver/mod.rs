//! Address / coordinate to township and trustee record resolution.
//!
//! Each request moves one way through parsing, coordinate acquisition,
//! township containment and record matching. Every terminal state is a
//! distinct [`Resolution`] variant; nothing is retried.

mod resolution;

use tracing::{debug, info, warn};

use crate::address::{is_valid_zip, parse_address, ParsedAddress};
use crate::config::{AcquisitionMode, ResolverConfig};
use crate::dataset::{Dataset, Datasets};
use crate::geocode::{GeocodeCandidate, GeocodeQuery, Geocoder};
use crate::models::{GeoPoint, Record, Township};

pub use resolution::{
    CoordinateAcquisition, InputError, Location, MatchMethod, NotFoundCause, Resolution,
    Resources,
};

const TOWNSHIP_MARKER: &str = " Township";

pub struct Resolver<G> {
    config: ResolverConfig,
    datasets: Datasets,
    geocoder: G,
}

impl<G: Geocoder> Resolver<G> {
    pub fn new(config: ResolverConfig, datasets: Datasets, geocoder: G) -> Self {
        Self {
            config,
            datasets,
            geocoder,
        }
    }

    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    /// Resolve a free-text address using the configured acquisition mode
    pub async fn resolve_by_address(&self, address: &str, postal_code: Option<&str>) -> Resolution {
        self.resolve_by_address_with(address, postal_code, self.config.acquisition)
            .await
    }

    /// Resolve a free-text address with an explicit acquisition mode
    pub async fn resolve_by_address_with(
        &self,
        address: &str,
        postal_code: Option<&str>,
        mode: AcquisitionMode,
    ) -> Resolution {
        let parsed = match parse_address(address) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Rejected address {:?}: {}", address, e);
                return Resolution::invalid(e);
            }
        };

        let postal_code = postal_code.map(str::trim).filter(|z| !z.is_empty());
        if let Some(zip) = postal_code {
            if !is_valid_zip(zip) {
                return Resolution::invalid(InputError::InvalidPostalCode {
                    value: zip.to_string(),
                });
            }
        }

        if !parsed.state.eq_ignore_ascii_case(&self.config.home_state_code) {
            debug!("Address {} is outside the service state", parsed);
            return Resolution::invalid(InputError::OutsideServiceState {
                state: parsed.state.clone(),
                service_area: self.config.home_state_name.clone(),
            });
        }

        let location = match self.acquire(&parsed, postal_code, mode).await {
            Ok(location) => location,
            Err(terminal) => return terminal,
        };

        self.locate(location, false)
    }

    /// Reverse path: known coordinates, plus the county resource listing
    pub fn resolve_by_coordinates(&self, lat: f64, lon: f64) -> Resolution {
        match direct_location(lat, lon) {
            Ok(location) => self.locate(location, true),
            Err(invalid) => invalid,
        }
    }

    /// Trustee record whose own coordinates are nearest the point, within
    /// the configured threshold. Ignores township boundaries.
    pub fn resolve_nearest_record(&self, lat: f64, lon: f64) -> Resolution {
        match direct_location(lat, lon) {
            Ok(location) => self.match_nearest_record(location, false),
            Err(invalid) => invalid,
        }
    }

    async fn acquire(
        &self,
        parsed: &ParsedAddress,
        postal_code: Option<&str>,
        mode: AcquisitionMode,
    ) -> Result<Location, Resolution> {
        match mode {
            AcquisitionMode::Provider => self.geocode(parsed, postal_code).await,
            AcquisitionMode::Interpolated => self.interpolate(parsed),
            AcquisitionMode::ProviderThenInterpolated => {
                match self.geocode(parsed, postal_code).await {
                    Ok(location) => Ok(location),
                    Err(provider_outcome) if self.datasets.address_points.is_ready() => {
                        debug!("Provider gave no location for {}, interpolating", parsed);
                        self.interpolate(parsed).map_err(|_| provider_outcome)
                    }
                    Err(provider_outcome) => Err(provider_outcome),
                }
            }
        }
    }

    async fn geocode(
        &self,
        parsed: &ParsedAddress,
        postal_code: Option<&str>,
    ) -> Result<Location, Resolution> {
        let query = GeocodeQuery {
            address: Some(parsed.to_string()),
            postal_code: postal_code.map(str::to_string),
        };

        let candidates = match self.geocoder.geocode(&query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Geocoding failed for {}: {}", parsed, e);
                return Err(Resolution::not_found(NotFoundCause::ProviderError {
                    message: e.to_string(),
                }));
            }
        };

        let candidates: Vec<GeocodeCandidate> = candidates
            .into_iter()
            .filter(|c| c.location.is_valid())
            .collect();
        debug!("{} geocoding candidates for {}", candidates.len(), parsed);

        self.select_candidate(&candidates, postal_code.is_some())
            .map(|c| Location::new(c.location, CoordinateAcquisition::ProviderGeocode))
            .ok_or_else(|| Resolution::not_found(NotFoundCause::NoCandidates))
    }

    /// With a postal code hint and several candidates, prefer the first one in
    /// the home state. Otherwise the provider's first candidate.
    fn select_candidate<'a>(
        &self,
        candidates: &'a [GeocodeCandidate],
        has_postal_code: bool,
    ) -> Option<&'a GeocodeCandidate> {
        if has_postal_code && candidates.len() > 1 {
            let in_state = candidates.iter().find(|c| {
                c.in_region(&self.config.home_state_code, &self.config.home_state_name)
            });
            if in_state.is_some() {
                return in_state;
            }
        }
        candidates.first()
    }

    fn interpolate(&self, parsed: &ParsedAddress) -> Result<Location, Resolution> {
        let streets = match &self.datasets.address_points {
            Dataset::Ready(streets) => streets,
            Dataset::Unavailable { reason } => {
                return Err(Resolution::DataUnavailable {
                    dataset: "address_points".to_string(),
                    reason: reason.clone(),
                    township: None,
                    location: None,
                    resources: None,
                })
            }
        };

        parsed
            .house_number_and_street()
            .and_then(|(number, street)| streets.locate(number, street))
            .map(|point| Location::new(point, CoordinateAcquisition::Interpolated))
            .ok_or_else(|| Resolution::not_found(NotFoundCause::NotInAddressPoints))
    }

    fn locate(&self, location: Location, with_resources: bool) -> Resolution {
        let Some(township) = self
            .datasets
            .townships
            .locate_by_containment(location.lat, location.lon)
        else {
            debug!("({}, {}) is outside every township", location.lat, location.lon);
            if self.config.nearest_fallback {
                return match self.match_nearest_record(location, with_resources) {
                    Resolution::NotFound(_) => Resolution::CoordinatesOnly { location },
                    matched => matched,
                };
            }
            return Resolution::CoordinatesOnly { location };
        };

        let resources = with_resources.then(|| self.county_resources(&township.county));
        let store = match &self.datasets.trustees {
            Dataset::Ready(store) => store,
            Dataset::Unavailable { reason } => {
                return Resolution::DataUnavailable {
                    dataset: "trustees".to_string(),
                    reason: reason.clone(),
                    township: Some(township),
                    location: Some(location),
                    resources,
                }
            }
        };

        match store.find_by_unit(&township.county, &township.name) {
            Some(record) => {
                info!("Resolved {} to {}", township, record.name);
                Resolution::Matched {
                    record: record.clone(),
                    township,
                    location,
                    method: MatchMethod::Containment,
                    distance_km: None,
                    resources,
                }
            }
            None => {
                info!("Resolved {} but no record is on file", township);
                Resolution::UnitOnly {
                    township,
                    location,
                    resources,
                }
            }
        }
    }

    fn match_nearest_record(&self, location: Location, with_resources: bool) -> Resolution {
        let store = match &self.datasets.trustees {
            Dataset::Ready(store) => store,
            Dataset::Unavailable { reason } => {
                return Resolution::DataUnavailable {
                    dataset: "trustees".to_string(),
                    reason: reason.clone(),
                    township: None,
                    location: Some(location),
                    resources: None,
                }
            }
        };

        let threshold_km = self.config.nearest_threshold_km;
        let Some((record, distance)) = store.nearest(location.point(), threshold_km) else {
            return Resolution::not_found(NotFoundCause::NoRecordWithinThreshold { threshold_km });
        };

        debug!("Nearest record to {:?} is {} at {:.2} km", location, record.name, distance);
        let township = self.record_township(record);
        let resources = with_resources.then(|| self.county_resources(&township.county));
        Resolution::Matched {
            township,
            record: record.clone(),
            location,
            method: MatchMethod::NearestRecord,
            distance_km: Some(distance),
            resources,
        }
    }

    /// Township of a record: the boundary containing its coordinates, else
    /// derived from its display name ("Perry Township Trustee").
    fn record_township(&self, record: &Record) -> Township {
        record
            .coordinates()
            .and_then(|p| self.datasets.townships.locate_by_containment(p.lat, p.lon))
            .filter(|t| record.matches_unit(&t.county, &t.name))
            .unwrap_or_else(|| {
                let name = match record.name.find(TOWNSHIP_MARKER) {
                    Some(end) => &record.name[..end + TOWNSHIP_MARKER.len()],
                    None => record.name.as_str(),
                };
                Township::new(record.county.clone(), name)
            })
    }

    fn county_resources(&self, county: &str) -> Resources {
        match &self.datasets.resources {
            Dataset::Ready(store) => Resources::Listed {
                records: store.find_by_county(county).into_iter().cloned().collect(),
            },
            Dataset::Unavailable { reason } => Resources::Unavailable {
                reason: reason.clone(),
            },
        }
    }
}

fn direct_location(lat: f64, lon: f64) -> Result<Location, Resolution> {
    let point = GeoPoint::new(lat, lon);
    if !point.is_valid() {
        return Err(Resolution::invalid(InputError::InvalidCoordinates { lat, lon }));
    }
    Ok(Location::new(point, CoordinateAcquisition::DirectInput))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::GeocodeError;
    use crate::interpolate::StreetIndex;
    use crate::models::AddressPoint;
    use crate::pip::{PipService, TownshipBoundary, TownshipIndex};
    use crate::records::RecordStore;
    use geo::{polygon, MultiPolygon};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Geocoder answering from a fixed script
    struct FakeGeocoder {
        result: Result<Vec<GeocodeCandidate>, u16>,
        calls: AtomicUsize,
        last_query: Mutex<Option<GeocodeQuery>>,
    }

    impl FakeGeocoder {
        fn answering(candidates: Vec<GeocodeCandidate>) -> Self {
            Self {
                result: Ok(candidates),
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                result: Err(status),
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            }
        }
    }

    impl Geocoder for FakeGeocoder {
        async fn geocode(
            &self,
            query: &GeocodeQuery,
        ) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.clone());
            self.result.clone().map_err(GeocodeError::Status)
        }
    }

    fn candidate(lat: f64, lon: f64, region: &str) -> GeocodeCandidate {
        GeocodeCandidate {
            location: GeoPoint::new(lat, lon),
            region_hint: Some(region.to_string()),
        }
    }

    fn record(county: &str, name: &str, coords: Option<(f64, f64)>) -> Record {
        let mut record = Record::placeholder(county, "x");
        record.name = name.to_string();
        record.address = Some("401 N Morton St".to_string());
        record.latitude = coords.map(|c| c.0);
        record.longitude = coords.map(|c| c.1);
        record
    }

    /// Two townships side by side in Monroe County around Bloomington
    fn datasets() -> Datasets {
        let bloomington = polygon![
            (x: -86.60, y: 39.15),
            (x: -86.45, y: 39.15),
            (x: -86.45, y: 39.25),
            (x: -86.60, y: 39.25),
            (x: -86.60, y: 39.15),
        ];
        let perry = polygon![
            (x: -86.60, y: 39.05),
            (x: -86.45, y: 39.05),
            (x: -86.45, y: 39.15),
            (x: -86.60, y: 39.15),
            (x: -86.60, y: 39.05),
        ];
        let index = TownshipIndex::build(vec![
            TownshipBoundary::new(
                Township::new("Monroe", "Bloomington Township"),
                MultiPolygon(vec![bloomington]),
                0,
            ),
            TownshipBoundary::new(
                Township::new("Monroe", "Perry Township"),
                MultiPolygon(vec![perry]),
                1,
            ),
        ]);

        let trustees = RecordStore::from_records(vec![record(
            "Monroe",
            "Bloomington Township Trustee",
            Some((39.1700, -86.5300)),
        )]);
        let resources = RecordStore::from_records(vec![
            record("Monroe", "Community Kitchen", None),
            record("Brown", "Brown County Food Pantry", None),
        ]);
        let points = vec![
            AddressPoint::new("300", "E Winslow Rd", GeoPoint::new(39.1400, -86.5200)),
            AddressPoint::new("350", "E Winslow Rd", GeoPoint::new(39.1400, -86.5100)),
        ];

        Datasets {
            townships: Arc::new(PipService::new(index)),
            trustees: Dataset::ready(trustees),
            resources: Dataset::ready(resources),
            address_points: Dataset::ready(StreetIndex::from_points(&points)),
        }
    }

    fn build_resolver(geocoder: FakeGeocoder) -> Resolver<FakeGeocoder> {
        Resolver::new(ResolverConfig::default(), datasets(), geocoder)
    }

    #[test]
    fn test_bloomington_coordinates_match_monroe_record() {
        let resolver = build_resolver(FakeGeocoder::answering(vec![]));
        let resolution = resolver.resolve_by_coordinates(39.1653, -86.5264);

        let township = resolution.township().unwrap();
        assert_eq!(township.county, "Monroe");
        let record = resolution.record().unwrap();
        assert!(record
            .name
            .to_lowercase()
            .starts_with(&township.bare_name().to_lowercase()));

        match resolution {
            Resolution::Matched {
                method, resources, ..
            } => {
                assert_eq!(method, MatchMethod::Containment);
                match resources {
                    Some(Resources::Listed { records }) => {
                        assert_eq!(records.len(), 1);
                        assert_eq!(records[0].name, "Community Kitchen");
                    }
                    other => panic!("expected county listing, got {:?}", other),
                }
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_new_york_is_coordinates_only() {
        let resolver = build_resolver(FakeGeocoder::answering(vec![]));
        let resolution = resolver.resolve_by_coordinates(40.7128, -74.0060);
        assert!(matches!(resolution, Resolution::CoordinatesOnly { .. }));
        assert!(resolution.township().is_none());
    }

    #[test]
    fn test_unit_without_record() {
        let resolver = build_resolver(FakeGeocoder::answering(vec![]));
        let resolution = resolver.resolve_by_coordinates(39.10, -86.50);
        match resolution {
            Resolution::UnitOnly { township, .. } => assert_eq!(township.name, "Perry Township"),
            other => panic!("expected unit only, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_coordinates() {
        let resolver = build_resolver(FakeGeocoder::answering(vec![]));
        assert!(matches!(
            resolver.resolve_by_coordinates(f64::NAN, -86.5),
            Resolution::InvalidInput {
                error: InputError::InvalidCoordinates { .. }
            }
        ));
        assert!(matches!(
            resolver.resolve_nearest_record(91.0, 0.0),
            Resolution::InvalidInput { .. }
        ));
    }

    #[tokio::test]
    async fn test_malformed_address_is_invalid_input() {
        let geocoder = FakeGeocoder::answering(vec![candidate(39.1653, -86.5264, "IN")]);
        let resolver = build_resolver(geocoder);
        let resolution = resolver.resolve_by_address("just a name", None).await;
        assert!(matches!(
            resolution,
            Resolution::InvalidInput {
                error: InputError::Address(_)
            }
        ));
        assert_eq!(resolver.geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_out_of_state_address_skips_geocoding() {
        let resolver = build_resolver(FakeGeocoder::answering(vec![]));
        let resolution = resolver
            .resolve_by_address("350 5th Ave, New York, NY 10118", None)
            .await;
        assert!(matches!(
            resolution,
            Resolution::InvalidInput {
                error: InputError::OutsideServiceState { .. }
            }
        ));
        assert_eq!(resolver.geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_postal_code_hint() {
        let resolver = build_resolver(FakeGeocoder::answering(vec![]));
        let resolution = resolver
            .resolve_by_address("1 Main St, Bloomington, IN", Some("4740"))
            .await;
        assert!(matches!(
            resolution,
            Resolution::InvalidInput {
                error: InputError::InvalidPostalCode { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_geocoded_address_matches() {
        let geocoder = FakeGeocoder::answering(vec![candidate(39.1653, -86.5264, "US-IN")]);
        let resolver = build_resolver(geocoder);
        let resolution = resolver
            .resolve_by_address("401 N Morton St, Bloomington, IN 47404", None)
            .await;

        assert_eq!(
            resolution.location().map(|l| l.acquisition),
            Some(CoordinateAcquisition::ProviderGeocode)
        );
        assert_eq!(
            resolution.record().map(|r| r.name.as_str()),
            Some("Bloomington Township Trustee")
        );
        // forward path carries no resource listing
        assert!(matches!(
            resolution,
            Resolution::Matched {
                resources: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_postal_code_prefers_home_state_candidate() {
        let geocoder = FakeGeocoder::answering(vec![
            candidate(40.4842, -88.9937, "Illinois"),
            candidate(39.1653, -86.5264, "Indiana"),
        ]);
        let resolver = build_resolver(geocoder);
        let resolution = resolver
            .resolve_by_address("1 Main St, Bloomington, IN", Some("47401"))
            .await;
        assert_eq!(resolution.township().map(|t| t.county.as_str()), Some("Monroe"));

        let query = resolver.geocoder.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.postal_code.as_deref(), Some("47401"));
    }

    #[tokio::test]
    async fn test_without_postal_code_first_candidate_wins() {
        let geocoder = FakeGeocoder::answering(vec![
            candidate(40.4842, -88.9937, "Illinois"),
            candidate(39.1653, -86.5264, "Indiana"),
        ]);
        let resolver = build_resolver(geocoder);
        let resolution = resolver
            .resolve_by_address("1 Main St, Bloomington, IN", None)
            .await;
        assert!(matches!(resolution, Resolution::CoordinatesOnly { .. }));
    }

    #[tokio::test]
    async fn test_no_candidates_and_provider_failure_are_distinct() {
        let resolver = build_resolver(FakeGeocoder::answering(vec![]));
        assert_eq!(
            resolver
                .resolve_by_address("1 Main St, Bloomington, IN", None)
                .await,
            Resolution::NotFound(NotFoundCause::NoCandidates)
        );

        let resolver = build_resolver(FakeGeocoder::failing(503));
        match resolver
            .resolve_by_address("1 Main St, Bloomington, IN", None)
            .await
        {
            Resolution::NotFound(NotFoundCause::ProviderError { message }) => {
                assert!(message.contains("503"))
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_interpolated_acquisition() {
        let resolver = build_resolver(FakeGeocoder::answering(vec![]));
        let resolution = resolver
            .resolve_by_address_with(
                "300 E Winslow Rd, Bloomington, IN 47401",
                None,
                AcquisitionMode::Interpolated,
            )
            .await;

        let location = resolution.location().unwrap();
        assert_eq!(location.acquisition, CoordinateAcquisition::Interpolated);
        assert_eq!(location.point(), GeoPoint::new(39.1400, -86.5200));
        assert_eq!(resolution.township().map(|t| t.name.as_str()), Some("Perry Township"));
        assert_eq!(resolver.geocoder.calls.load(Ordering::SeqCst), 0);

        assert_eq!(
            resolver
                .resolve_by_address_with(
                    "12 Nowhere Ln, Bloomington, IN",
                    None,
                    AcquisitionMode::Interpolated
                )
                .await,
            Resolution::NotFound(NotFoundCause::NotInAddressPoints)
        );
    }

    #[tokio::test]
    async fn test_provider_then_interpolated_falls_back() {
        let resolver = build_resolver(FakeGeocoder::failing(500));
        let resolution = resolver
            .resolve_by_address_with(
                "350 E Winslow Rd, Bloomington, IN",
                None,
                AcquisitionMode::ProviderThenInterpolated,
            )
            .await;
        assert_eq!(
            resolution.location().map(|l| l.acquisition),
            Some(CoordinateAcquisition::Interpolated)
        );
        assert_eq!(resolver.geocoder.calls.load(Ordering::SeqCst), 1);

        // interpolation miss reports the provider outcome
        let resolution = resolver
            .resolve_by_address_with(
                "1 Elm St, Bloomington, IN",
                None,
                AcquisitionMode::ProviderThenInterpolated,
            )
            .await;
        assert!(matches!(
            resolution,
            Resolution::NotFound(NotFoundCause::ProviderError { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_datasets_are_reported_separately() {
        let mut data = datasets();
        data.trustees = Dataset::unavailable("dataset not found: trustees.json");
        data.address_points = Dataset::unavailable("no address point dataset configured");
        let resolver = Resolver::new(
            ResolverConfig::default(),
            data,
            FakeGeocoder::answering(vec![]),
        );

        match resolver.resolve_by_coordinates(39.1653, -86.5264) {
            Resolution::DataUnavailable {
                dataset, township, ..
            } => {
                assert_eq!(dataset, "trustees");
                assert_eq!(
                    township.map(|t| t.name),
                    Some("Bloomington Township".to_string())
                );
            }
            other => panic!("expected data unavailable, got {:?}", other),
        }

        let resolution = resolver
            .resolve_by_address_with(
                "300 E Winslow Rd, Bloomington, IN",
                None,
                AcquisitionMode::Interpolated,
            )
            .await;
        assert!(matches!(
            resolution,
            Resolution::DataUnavailable { ref dataset, .. } if dataset == "address_points"
        ));
    }

    #[test]
    fn test_missing_trustees_still_lists_county_resources() {
        let mut data = datasets();
        data.trustees = Dataset::unavailable("dataset not found: trustees.json");
        let resolver = Resolver::new(
            ResolverConfig::default(),
            data,
            FakeGeocoder::answering(vec![]),
        );

        match resolver.resolve_by_coordinates(39.1653, -86.5264) {
            Resolution::DataUnavailable {
                resources: Some(Resources::Listed { records }),
                ..
            } => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].name, "Community Kitchen");
            }
            other => panic!("expected data unavailable with resources, got {:?}", other),
        }
    }

    #[test]
    fn test_nearest_record_threshold() {
        let resolver = build_resolver(FakeGeocoder::answering(vec![]));

        // ~0.6 km from the Bloomington office
        match resolver.resolve_nearest_record(39.1653, -86.5264) {
            Resolution::Matched {
                method,
                distance_km,
                township,
                ..
            } => {
                assert_eq!(method, MatchMethod::NearestRecord);
                assert!(distance_km.unwrap() < 1.0);
                assert_eq!(township.name, "Bloomington Township");
            }
            other => panic!("expected nearest match, got {:?}", other),
        }

        // Indianapolis is ~74 km away
        assert_eq!(
            resolver.resolve_nearest_record(39.7684, -86.1581),
            Resolution::NotFound(NotFoundCause::NoRecordWithinThreshold { threshold_km: 50.0 })
        );
    }

    #[test]
    fn test_nearest_fallback_outside_boundaries() {
        let config = ResolverConfig {
            nearest_fallback: true,
            ..ResolverConfig::default()
        };
        let resolver = Resolver::new(config, datasets(), FakeGeocoder::answering(vec![]));

        // north of both polygons, still near the office
        match resolver.resolve_by_coordinates(39.30, -86.53) {
            Resolution::Matched {
                method: MatchMethod::NearestRecord,
                resources: Some(Resources::Listed { records }),
                ..
            } => {
                let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
                assert_eq!(names, vec!["Community Kitchen"]);
            }
            other => panic!("expected nearest match with resources, got {:?}", other),
        }

        // the standalone nearest lookup carries no listing
        assert!(matches!(
            resolver.resolve_nearest_record(39.30, -86.53),
            Resolution::Matched {
                resources: None,
                ..
            }
        ));

        // far away: still only coordinates
        assert!(matches!(
            resolver.resolve_by_coordinates(40.7128, -74.0060),
            Resolution::CoordinatesOnly { .. }
        ));
    }

    #[test]
    fn test_record_township_from_name() {
        let resolver = build_resolver(FakeGeocoder::answering(vec![]));
        let office = record("Brown", "Hamblen Township Trustee", Some((39.2, -86.2)));
        assert_eq!(
            resolver.record_township(&office),
            Township::new("Brown", "Hamblen Township")
        );
    }
}
