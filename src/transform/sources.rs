//! Per-source mapping tables
//!
//! One [`SourceTable`] per known source type: the dataset name, the platform
//! constant stamped on every output row, and the ordered target columns.
//! Several raw fields appear both flat and nested depending on how the file
//! was scraped, so mappings list alternative source paths; the first
//! non-null path wins.

use super::mapping::{Caster, FieldMapping};
use crate::types::DataSourceType;

/// Mapping table for one source type
#[derive(Debug, Clone, Copy)]
pub struct SourceTable {
    /// Output dataset name
    pub dataset: &'static str,
    /// Classification tag this table consumes
    pub source_type: DataSourceType,
    /// Platform constant stamped on every row
    pub platform: &'static str,
    /// Ordered target columns
    pub fields: &'static [FieldMapping],
}

/// All source tables, in pipeline order
pub const ALL_TABLES: [&SourceTable; 5] = [
    &BOOKING_HOTELS,
    &BOOKING_REVIEWS,
    &TRIPADVISOR_HOTELS,
    &TRIPADVISOR_REVIEWS,
    &GEOSPATIAL_ATTRACTIONS,
];

const fn field(
    target: &'static str,
    sources: &'static [&'static str],
    cast: Caster,
) -> FieldMapping {
    FieldMapping {
        target,
        sources,
        cast,
    }
}

/// Booking.com hotel listings
pub const BOOKING_HOTELS: SourceTable = SourceTable {
    dataset: "booking_hotels",
    source_type: DataSourceType::BookingHotel,
    platform: "booking.com",
    fields: &[
        field("booking_hotel_id", &["hotelId"], Caster::Text),
        field("hotel_name", &["name"], Caster::Text),
        field("accommodation_type", &["type"], Caster::Text),
        field("description", &["description"], Caster::Text),
        field("stars", &["stars"], Caster::Integer),
        field("price", &["price"], Caster::Text),
        field("currency", &["currency"], Caster::Text),
        field("rating", &["rating"], Caster::Rating),
        field("reviews", &["reviews"], Caster::Integer),
        field("latitude", &["location.lat"], Caster::Double),
        field("longitude", &["location.lng"], Caster::Double),
        field("full_address", &["address.full", "address"], Caster::Text),
        field("street_address", &["street", "address.street"], Caster::Text),
        field("country", &["countryCode", "address.country"], Caster::Text),
        field("region", &["state", "address.region"], Caster::Text),
        field(
            "postal_code",
            &["postalCode", "address.postalCode"],
            Caster::Text,
        ),
        field("breakfast", &["breakfast"], Caster::Text),
        field("check_in_time", &["checkIn"], Caster::Text),
        field("check_out_time", &["checkOut"], Caster::Text),
        field("booking_url", &["url"], Caster::Text),
        field("facilities", &["facilities"], Caster::Json),
    ],
};

/// Booking.com hotel reviews
pub const BOOKING_REVIEWS: SourceTable = SourceTable {
    dataset: "booking_reviews",
    source_type: DataSourceType::BookingReview,
    platform: "booking.com",
    fields: &[
        field("review_id", &["id"], Caster::Text),
        field("booking_hotel_id", &["hotelId"], Caster::Text),
        field("rating", &["rating"], Caster::Rating),
        field("review_title", &["reviewTitle"], Caster::Text),
        field("liked_text", &["likedText"], Caster::Text),
        field("disliked_text", &["dislikedText"], Caster::Text),
        field("traveler_type", &["travelerType"], Caster::Text),
        field("user_location", &["userLocation"], Caster::Text),
        field("user_name", &["userName"], Caster::Text),
        field("number_of_nights", &["numberOfNights"], Caster::Integer),
        field("room_info", &["roomInfo"], Caster::Text),
        field("helpful_votes", &["helpfulVotes"], Caster::Integer),
        field("review_language", &["reviewLanguage"], Caster::Text),
        field("check_in_date", &["checkInDate"], Caster::Date),
        field("check_out_date", &["checkOutDate"], Caster::Date),
        field("review_date", &["reviewDate"], Caster::Date),
        field("category_ratings", &["hotelRatingScores"], Caster::Json),
    ],
};

/// TripAdvisor hotel listings
pub const TRIPADVISOR_HOTELS: SourceTable = SourceTable {
    dataset: "tripadvisor_hotels",
    source_type: DataSourceType::TripadvisorHotel,
    platform: "tripadvisor.com",
    fields: &[
        field("tripadvisor_location_id", &["locationId"], Caster::Text),
        field("hotel_name", &["name"], Caster::Text),
        field("accommodation_type", &["category"], Caster::Text),
        field("description", &["description"], Caster::Text),
        field("rating", &["rating"], Caster::Rating),
        field("reviews_count", &["numberOfReviews"], Caster::Integer),
        field("hotel_class", &["hotelClass"], Caster::Text),
        field("latitude", &["latitude"], Caster::Double),
        field("longitude", &["longitude"], Caster::Double),
        field("full_address", &["address"], Caster::Text),
        field(
            "street_address",
            &["street", "addressObj.street1"],
            Caster::Text,
        ),
        field("city", &["city", "addressObj.city"], Caster::Text),
        field("state", &["state", "addressObj.state"], Caster::Text),
        field("country", &["countryCode", "addressObj.country"], Caster::Text),
        field(
            "postal_code",
            &["postalCode", "addressObj.postalcode"],
            Caster::Text,
        ),
        field("phone", &["phone"], Caster::Text),
        field("email", &["email"], Caster::Text),
        field("website", &["website"], Caster::Text),
        field("ranking_position", &["rankingPosition"], Caster::Integer),
        field(
            "ranking_denominator",
            &["rankingDenominator"],
            Caster::Integer,
        ),
        field("price_level", &["priceLevel"], Caster::Text),
        field("price_range", &["priceRange"], Caster::Text),
        field("photo_count", &["photoCount"], Caster::Integer),
        field("amenities", &["amenities"], Caster::Json),
    ],
};

/// TripAdvisor hotel reviews
pub const TRIPADVISOR_REVIEWS: SourceTable = SourceTable {
    dataset: "tripadvisor_reviews",
    source_type: DataSourceType::TripadvisorReview,
    platform: "tripadvisor.com",
    fields: &[
        field("review_id", &["id"], Caster::Text),
        field("tripadvisor_location_id", &["locationId"], Caster::Text),
        field("rating", &["rating"], Caster::Rating),
        field("review_title", &["title"], Caster::Text),
        field("review_text", &["text"], Caster::Text),
        field("review_language", &["lang"], Caster::Text),
        field("trip_type", &["tripType"], Caster::Text),
        field("user_name", &["user.name"], Caster::Text),
        field("user_location", &["user.userLocation.name"], Caster::Text),
        field(
            "user_total_contributions",
            &["user.contributions.totalContributions"],
            Caster::Integer,
        ),
        field("published_date", &["publishedDate"], Caster::Date),
        field("travel_date", &["travelDate"], Caster::Text),
        field("photos_count", &["photos"], Caster::ArrayLen),
    ],
};

/// Google Maps attraction listings
pub const GEOSPATIAL_ATTRACTIONS: SourceTable = SourceTable {
    dataset: "geospatial_attractions",
    source_type: DataSourceType::GeospatialAttraction,
    platform: "google_maps",
    fields: &[
        field("place_id", &["placeId"], Caster::Text),
        field("attraction_name", &["title"], Caster::Text),
        field("category_name", &["categoryName"], Caster::Text),
        field("rating", &["totalScore"], Caster::Double),
        field("reviews_count", &["reviewsCount"], Caster::Integer),
        field("images_count", &["imagesCount"], Caster::Integer),
        field("latitude", &["latitude", "location.lat"], Caster::Double),
        field("longitude", &["longitude", "location.lng"], Caster::Double),
        field("full_address", &["address"], Caster::Text),
        field("neighborhood", &["neighborhood"], Caster::Text),
        field("city", &["city"], Caster::Text),
        field("state", &["state"], Caster::Text),
        field("postal_code", &["postalCode"], Caster::Text),
        field("phone", &["phone"], Caster::Text),
        field("phone_unformatted", &["phoneUnformatted"], Caster::Text),
        field(
            "permanently_closed",
            &["permanentlyClosed"],
            Caster::Boolean,
        ),
        field(
            "temporarily_closed",
            &["temporarilyClosed"],
            Caster::Boolean,
        ),
        field("additional_info", &["additionalInfo"], Caster::Json),
        field("opening_hours", &["openingHours"], Caster::Json),
        field("categories", &["categories"], Caster::Json),
    ],
};
