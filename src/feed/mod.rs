//! Proximity-ranked deal discovery.
//!
//! Pure transforms over a snapshot of storage data: the route layer batch
//! fetches unclaimed deals, their restaurants, and their images up front,
//! and everything here runs without further I/O.

use serde::Serialize;
use std::collections::HashMap;

use crate::constants::UNKNOWN_RESTAURANT;
use crate::error::{AppError, AppResult};
use crate::utils::distance::{distance_miles, Coordinate};

/// A deal row as read from storage, before enrichment.
#[derive(Debug, Clone)]
pub struct DealRecord {
    pub id: i64,
    pub restaurant_id: i64,
    pub title: String,
    pub description: String,
    pub quantity: i64,
    pub original_price: f64,
    pub updated_price: f64,
    pub pickup_start: String,
    pub pickup_end: String,
    pub claimed: bool,
    pub created_at: String,
}

/// The slice of a restaurant user the feed needs.
#[derive(Debug, Clone)]
pub struct RestaurantRecord {
    pub id: i64,
    pub name: String,
    pub coordinate: Option<Coordinate>,
}

/// A deal augmented with joined display data. Derived, never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedDeal {
    pub id: i64,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub title: String,
    pub description: String,
    pub quantity: i64,
    pub original_price: f64,
    pub updated_price: f64,
    pub pickup_start: String,
    pub pickup_end: String,
    pub distance_miles: Option<f64>,
    pub image_url: Option<String>,
}

/// Combines a raw deal with its restaurant and image, if resolved.
///
/// A missing restaurant degrades to a placeholder name and an unknown
/// distance; it never fails, so one unresolvable lookup cannot abort the
/// rest of a batch.
pub fn enrich_deal(
    deal: DealRecord,
    restaurant: Option<&RestaurantRecord>,
    customer: &Coordinate,
    image_url: Option<&str>,
) -> EnrichedDeal {
    let restaurant_name = restaurant
        .map(|r| r.name.clone())
        .unwrap_or_else(|| UNKNOWN_RESTAURANT.to_string());

    let distance = restaurant
        .and_then(|r| r.coordinate)
        .map(|coordinate| distance_miles(*customer, coordinate));

    EnrichedDeal {
        id: deal.id,
        restaurant_id: deal.restaurant_id,
        restaurant_name,
        title: deal.title,
        description: deal.description,
        quantity: deal.quantity,
        original_price: deal.original_price,
        updated_price: deal.updated_price,
        pickup_start: deal.pickup_start,
        pickup_end: deal.pickup_end,
        distance_miles: distance,
        image_url: image_url.map(|url| url.to_string()),
    }
}

/// Produces the distance-sorted feed of unclaimed deals.
///
/// Restaurants and images arrive as prebuilt id maps so enrichment is a
/// single pass regardless of feed size. Deals whose restaurant has no
/// stored coordinate are hidden rather than shown unsorted. The sort is
/// stable: equal distances keep their input order across calls.
pub fn assemble_feed(
    customer: Option<Coordinate>,
    deals: Vec<DealRecord>,
    restaurants_by_id: &HashMap<i64, RestaurantRecord>,
    images_by_deal_id: &HashMap<i64, String>,
) -> AppResult<Vec<EnrichedDeal>> {
    let customer = customer.ok_or_else(|| {
        AppError::LocationUnavailable(
            "No saved location. Set your location to browse nearby deals".to_string(),
        )
    })?;

    let mut enriched: Vec<EnrichedDeal> = deals
        .into_iter()
        .filter(|deal| !deal.claimed)
        .map(|deal| {
            let restaurant = restaurants_by_id.get(&deal.restaurant_id);
            let image_url = images_by_deal_id.get(&deal.id).map(String::as_str);
            enrich_deal(deal, restaurant, &customer, image_url)
        })
        .filter(|deal| deal.distance_miles.is_some())
        .collect();

    enriched.sort_by(|a, b| {
        a.distance_miles
            .unwrap_or(f64::MAX)
            .total_cmp(&b.distance_miles.unwrap_or(f64::MAX))
    });

    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_deal(id: i64, restaurant_id: i64, claimed: bool) -> DealRecord {
        DealRecord {
            id,
            restaurant_id,
            title: format!("Deal {}", id),
            description: "Surplus portions".to_string(),
            quantity: 3,
            original_price: 15.99,
            updated_price: 6.99,
            pickup_start: "2025-06-01T17:00:00".to_string(),
            pickup_end: "2025-06-01T20:00:00".to_string(),
            claimed,
            created_at: "2025-06-01T09:00:00".to_string(),
        }
    }

    fn make_restaurant(id: i64, name: &str, coordinate: Option<Coordinate>) -> RestaurantRecord {
        RestaurantRecord {
            id,
            name: name.to_string(),
            coordinate,
        }
    }

    fn loop_customer() -> Coordinate {
        Coordinate::new(41.8781, -87.6298)
    }

    #[test]
    fn test_enrich_resolves_name_distance_and_image() {
        let restaurant = make_restaurant(10, "Pasta Palace", Some(Coordinate::new(41.89, -87.64)));
        let enriched = enrich_deal(
            make_deal(1, 10, false),
            Some(&restaurant),
            &loop_customer(),
            Some("https://img.example/pasta.jpg"),
        );

        assert_eq!(enriched.restaurant_name, "Pasta Palace");
        assert!(enriched.distance_miles.is_some());
        assert_eq!(
            enriched.image_url.as_deref(),
            Some("https://img.example/pasta.jpg")
        );
    }

    #[test]
    fn test_enrich_missing_restaurant_degrades() {
        let enriched = enrich_deal(make_deal(1, 10, false), None, &loop_customer(), None);

        assert_eq!(enriched.restaurant_name, "Unknown Restaurant");
        assert_eq!(enriched.distance_miles, None);
        assert_eq!(enriched.image_url, None);
    }

    #[test]
    fn test_enrich_restaurant_without_coordinate_has_no_distance() {
        let restaurant = make_restaurant(10, "Taco Fiesta", None);
        let enriched = enrich_deal(
            make_deal(1, 10, false),
            Some(&restaurant),
            &loop_customer(),
            None,
        );

        assert_eq!(enriched.restaurant_name, "Taco Fiesta");
        assert_eq!(enriched.distance_miles, None);
    }

    #[test]
    fn test_feed_excludes_claimed_deals() {
        let mut restaurants = HashMap::new();
        restaurants.insert(
            10,
            make_restaurant(10, "Green Garden", Some(Coordinate::new(41.88, -87.63))),
        );
        restaurants.insert(
            11,
            make_restaurant(11, "Burger Barn", Some(Coordinate::new(41.90, -87.65))),
        );

        let deals = vec![make_deal(1, 10, false), make_deal(2, 11, true)];

        let feed = assemble_feed(
            Some(Coordinate::new(41.87, -87.62)),
            deals,
            &restaurants,
            &HashMap::new(),
        )
        .unwrap();

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, 1);
        assert!(feed[0].distance_miles.is_some());
    }

    #[test]
    fn test_feed_hides_unlocatable_restaurants() {
        let mut restaurants = HashMap::new();
        restaurants.insert(
            10,
            make_restaurant(10, "Located", Some(Coordinate::new(41.88, -87.63))),
        );
        restaurants.insert(11, make_restaurant(11, "Unlocated", None));

        let deals = vec![
            make_deal(1, 10, false),
            make_deal(2, 11, false),
            make_deal(3, 99, false), // no restaurant record at all
        ];

        let feed = assemble_feed(Some(loop_customer()), deals, &restaurants, &HashMap::new())
            .unwrap();

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, 1);
        assert!(feed.iter().all(|d| d.distance_miles.is_some()));
    }

    #[test]
    fn test_feed_sorted_ascending_by_distance() {
        let mut restaurants = HashMap::new();
        restaurants.insert(
            10,
            make_restaurant(10, "Far", Some(Coordinate::new(42.05, -87.90))),
        );
        restaurants.insert(
            11,
            make_restaurant(11, "Near", Some(Coordinate::new(41.879, -87.631))),
        );
        restaurants.insert(
            12,
            make_restaurant(12, "Mid", Some(Coordinate::new(41.95, -87.70))),
        );

        let deals = vec![
            make_deal(1, 10, false),
            make_deal(2, 11, false),
            make_deal(3, 12, false),
        ];

        let feed = assemble_feed(Some(loop_customer()), deals, &restaurants, &HashMap::new())
            .unwrap();

        assert_eq!(feed.len(), 3);
        for pair in feed.windows(2) {
            assert!(pair[0].distance_miles.unwrap() <= pair[1].distance_miles.unwrap());
        }
        assert_eq!(feed[0].restaurant_name, "Near");
        assert_eq!(feed[2].restaurant_name, "Far");
    }

    #[test]
    fn test_feed_ties_keep_input_order() {
        let shared = Coordinate::new(41.90, -87.65);
        let mut restaurants = HashMap::new();
        restaurants.insert(10, make_restaurant(10, "First", Some(shared)));
        restaurants.insert(11, make_restaurant(11, "Second", Some(shared)));

        let deals = vec![make_deal(7, 10, false), make_deal(3, 11, false)];

        let first = assemble_feed(
            Some(loop_customer()),
            deals.clone(),
            &restaurants,
            &HashMap::new(),
        )
        .unwrap();
        let second = assemble_feed(Some(loop_customer()), deals, &restaurants, &HashMap::new())
            .unwrap();

        assert_eq!(first[0].id, 7);
        assert_eq!(first[1].id, 3);
        let first_ids: Vec<i64> = first.iter().map(|d| d.id).collect();
        let second_ids: Vec<i64> = second.iter().map(|d| d.id).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn test_feed_without_customer_location_is_an_error() {
        let result = assemble_feed(
            None,
            vec![make_deal(1, 10, false)],
            &HashMap::new(),
            &HashMap::new(),
        );

        assert!(matches!(result, Err(AppError::LocationUnavailable(_))));
    }

    #[test]
    fn test_feed_empty_input_is_ok_and_empty() {
        let feed = assemble_feed(
            Some(loop_customer()),
            Vec::new(),
            &HashMap::new(),
            &HashMap::new(),
        )
        .unwrap();
        assert!(feed.is_empty());
    }

    #[test]
    fn test_feed_attaches_images_by_deal_id() {
        let mut restaurants = HashMap::new();
        restaurants.insert(
            10,
            make_restaurant(10, "Pasta Palace", Some(Coordinate::new(41.88, -87.63))),
        );

        let mut images = HashMap::new();
        images.insert(1, "https://img.example/pasta.jpg".to_string());

        let feed = assemble_feed(
            Some(loop_customer()),
            vec![make_deal(1, 10, false), make_deal(2, 10, false)],
            &restaurants,
            &images,
        )
        .unwrap();

        let with_image = feed.iter().find(|d| d.id == 1).unwrap();
        let without_image = feed.iter().find(|d| d.id == 2).unwrap();
        assert_eq!(
            with_image.image_url.as_deref(),
            Some("https://img.example/pasta.jpg")
        );
        assert_eq!(without_image.image_url, None);
    }
}
