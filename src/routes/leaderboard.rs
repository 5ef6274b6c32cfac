use axum::{routing::post, Json, Router};

use crate::auth::AppState;
use crate::error::AppResult;
use crate::models::{LeaderboardEntry, LeaderboardResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/leaderboard/list", post(list_leaderboard))
}

// Community-wide seed standings; refreshed out of band.
const CUSTOMER_STANDINGS: [(&str, &str, i64, i64); 10] = [
    ("Emma Johnson", "Seattle, WA", 4250, 85),
    ("Marcus Chen", "Portland, OR", 3840, 76),
    ("Sophia Rodriguez", "San Francisco, CA", 3620, 72),
    ("Jamal Williams", "Chicago, IL", 3175, 63),
    ("Priya Patel", "Austin, TX", 2990, 60),
    ("Noah Kim", "New York, NY", 2840, 57),
    ("Lena Müller", "Denver, CO", 2720, 54),
    ("David Thompson", "Boston, MA", 2580, 52),
    ("Maria Garcia", "Los Angeles, CA", 2430, 49),
    ("Kevin O'Brien", "Minneapolis, MN", 2250, 45),
];

const RESTAURANT_STANDINGS: [(&str, &str, i64, i64); 10] = [
    ("Green Table Bistro", "Seattle, WA", 12450, 249),
    ("Sustainable Eats", "Portland, OR", 11280, 226),
    ("Zero Waste Kitchen", "San Francisco, CA", 10750, 215),
    ("Fresh & Conscious", "Austin, TX", 9840, 197),
    ("Eco Bites", "Chicago, IL", 9370, 187),
    ("The Mindful Plate", "New York, NY", 8920, 178),
    ("Harvest Community", "Boston, MA", 8450, 169),
    ("Conscious Cuisine", "Denver, CO", 7980, 160),
    ("Planet Friendly Foods", "Los Angeles, CA", 7540, 151),
    ("Green Gourmet", "Minneapolis, MN", 7120, 142),
];

fn to_entries(standings: &[(&str, &str, i64, i64)]) -> Vec<LeaderboardEntry> {
    standings
        .iter()
        .enumerate()
        .map(|(index, (name, location, points, food_saved_kg))| LeaderboardEntry {
            rank: index as i64 + 1,
            name: name.to_string(),
            location: location.to_string(),
            points: *points,
            food_saved_kg: *food_saved_kg,
        })
        .collect()
}

async fn list_leaderboard() -> AppResult<Json<LeaderboardResponse>> {
    Ok(Json(LeaderboardResponse {
        customers: to_entries(&CUSTOMER_STANDINGS),
        restaurants: to_entries(&RESTAURANT_STANDINGS),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_ranked_and_descending_by_points() {
        let customers = to_entries(&CUSTOMER_STANDINGS);

        assert_eq!(customers.len(), 10);
        assert_eq!(customers[0].rank, 1);
        assert_eq!(customers[0].name, "Emma Johnson");

        for pair in customers.windows(2) {
            assert!(pair[0].points >= pair[1].points);
            assert_eq!(pair[1].rank, pair[0].rank + 1);
        }
    }

    #[test]
    fn test_restaurant_standings_shape() {
        let restaurants = to_entries(&RESTAURANT_STANDINGS);
        assert_eq!(restaurants.len(), 10);
        assert_eq!(restaurants[0].name, "Green Table Bistro");
        assert_eq!(restaurants[9].rank, 10);
    }
}
