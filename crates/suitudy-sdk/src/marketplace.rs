//! Read-side views of the marketplace.
//!
//! Listings are discovered from `LectureListed` events and then checked
//! against the live lecture objects, since a deleted lecture leaves its
//! listing event behind. Passes are the `LecturePass` objects an account
//! owns.

use crate::api::{LedgerClient, ObjectResponse, SuiEvent};
use crate::api::response::{Balance, EventId};
use crate::error::SuitudyResult;
use crate::types::{
    Amount, CoinHolding, LECTURE_LISTED_EVENT, LECTURE_PASS_STRUCT, MARKETPLACE_MODULE, ObjectId,
    SuiAddress, TOKEN_STRUCT, struct_type,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shown for a listing whose lecture object has no description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// A lecture offered for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureListing {
    /// Lecture object id.
    pub id: ObjectId,
    /// Title.
    pub title: String,
    /// Account that listed the lecture.
    pub instructor: SuiAddress,
    /// Price in base units.
    pub price: Amount,
    /// Cover image URL.
    pub image_url: String,
    /// Description, filled in from the lecture object.
    pub description: String,
}

/// An access pass owned by a buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LecturePass {
    /// Pass object id.
    pub id: ObjectId,
    /// The lecture this pass unlocks.
    pub lecture_id: ObjectId,
    /// URL of the gated content.
    pub content_url: String,
    /// Lecture title, if the pass carries it.
    pub title: Option<String>,
    /// Cover image, if the pass carries it.
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
struct LectureListedPayload {
    lecture_id: ObjectId,
    title: String,
    instructor: SuiAddress,
    price: Amount,
    #[serde(default)]
    image_url: String,
}

#[derive(Deserialize)]
struct LectureFields {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Deserialize)]
struct PassFields {
    lecture_id: ObjectId,
    content_url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

/// Turns `LectureListed` events into listings, skipping other events and
/// payloads that do not parse.
pub fn listings_from_events(events: &[SuiEvent]) -> Vec<LectureListing> {
    events
        .iter()
        .filter(|event| event.is(LECTURE_LISTED_EVENT))
        .filter_map(|event| match event.parse::<LectureListedPayload>() {
            Ok(payload) => Some(LectureListing {
                id: payload.lecture_id,
                title: payload.title,
                instructor: payload.instructor,
                price: payload.price,
                image_url: payload.image_url,
                description: String::new(),
            }),
            Err(e) => {
                warn!(tx = %event.id.tx_digest, error = %e, "Skipping malformed listing event");
                None
            }
        })
        .collect()
}

/// Keeps the listings whose lecture object still exists and fills in the
/// description and image from the object's fields.
///
/// An empty object image keeps the image from the listing event. An empty
/// description becomes [`NO_DESCRIPTION`].
pub fn verify_listings(
    listings: Vec<LectureListing>,
    objects: &[ObjectResponse],
) -> Vec<LectureListing> {
    let live: HashMap<&ObjectId, LectureFields> = objects
        .iter()
        .filter(|object| object.exists())
        .filter_map(|object| {
            let data = object.data.as_ref()?;
            let fields = data.fields::<LectureFields>().ok()?;
            Some((&data.object_id, fields))
        })
        .collect();

    listings
        .into_iter()
        .filter_map(|mut listing| {
            let fields = live.get(&listing.id)?;
            listing.description = fields
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(NO_DESCRIPTION)
                .to_string();
            if let Some(image) = fields.image_url.as_ref().filter(|i| !i.is_empty()) {
                listing.image_url = image.clone();
            }
            Some(listing)
        })
        .collect()
}

/// Marketplace queries for one deployed package.
#[derive(Debug, Clone)]
pub struct Marketplace {
    client: Arc<LedgerClient>,
    package_id: ObjectId,
}

impl Marketplace {
    /// Creates a view over `package_id`.
    pub fn new(client: Arc<LedgerClient>, package_id: ObjectId) -> Self {
        Self { client, package_id }
    }

    /// Returns the fully-qualified token coin type.
    pub fn token_type(&self) -> String {
        struct_type(&self.package_id, MARKETPLACE_MODULE, TOKEN_STRUCT)
    }

    /// Returns the fully-qualified pass struct type.
    pub fn pass_type(&self) -> String {
        struct_type(&self.package_id, MARKETPLACE_MODULE, LECTURE_PASS_STRUCT)
    }

    /// Returns all marketplace events, newest first.
    pub async fn events(&self) -> SuitudyResult<Vec<SuiEvent>> {
        let mut events = Vec::new();
        let mut cursor: Option<EventId> = None;
        loop {
            let page = self
                .client
                .query_events(&self.package_id, MARKETPLACE_MODULE, cursor.as_ref(), None, true)
                .await?;
            let next = page.next().cloned();
            events.extend(page.data);
            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(events)
    }

    /// Returns the lectures currently for sale, newest first.
    pub async fn listings(&self) -> SuitudyResult<Vec<LectureListing>> {
        let events = self.events().await?;
        self.verified(listings_from_events(&events)).await
    }

    /// Returns the live lectures listed by `instructor`.
    pub async fn instructor_listings(
        &self,
        instructor: &SuiAddress,
    ) -> SuitudyResult<Vec<LectureListing>> {
        let events = self.events().await?;
        let mine = listings_from_events(&events)
            .into_iter()
            .filter(|listing| &listing.instructor == instructor)
            .collect();
        self.verified(mine).await
    }

    async fn verified(&self, listings: Vec<LectureListing>) -> SuitudyResult<Vec<LectureListing>> {
        if listings.is_empty() {
            return Ok(listings);
        }
        let ids: Vec<ObjectId> = listings.iter().map(|l| l.id.clone()).collect();
        let objects = self.client.multi_get_objects(&ids).await?;
        let total = listings.len();
        let live = verify_listings(listings, &objects);
        debug!(total, live = live.len(), "Verified lecture listings");
        Ok(live)
    }

    /// Returns the passes owned by `owner`.
    pub async fn passes(&self, owner: &SuiAddress) -> SuitudyResult<Vec<LecturePass>> {
        let pass_type = self.pass_type();
        let mut passes = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .client
                .get_owned_objects(owner, &pass_type, cursor.as_deref(), None)
                .await?;
            let next = page.next().cloned();
            passes.extend(page.data.iter().filter_map(pass_from_object));
            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(passes)
    }

    /// Returns the pass `owner` holds for `lecture_id`, if any.
    pub async fn pass_for_lecture(
        &self,
        owner: &SuiAddress,
        lecture_id: &ObjectId,
    ) -> SuitudyResult<Option<LecturePass>> {
        let passes = self.passes(owner).await?;
        Ok(passes.into_iter().find(|pass| &pass.lecture_id == lecture_id))
    }

    /// Returns every token coin `owner` holds, ready for the builders.
    pub async fn token_holdings(&self, owner: &SuiAddress) -> SuitudyResult<Vec<CoinHolding>> {
        self.client
            .get_all_coins(owner, Some(&self.token_type()))
            .await
    }

    /// Returns `owner`'s total token balance.
    pub async fn token_balance(&self, owner: &SuiAddress) -> SuitudyResult<Balance> {
        self.client
            .get_balance(owner, Some(&self.token_type()))
            .await
    }
}

fn pass_from_object(object: &ObjectResponse) -> Option<LecturePass> {
    let data = object.data.as_ref()?;
    match data.fields::<PassFields>() {
        Ok(fields) => Some(LecturePass {
            id: data.object_id.clone(),
            lecture_id: fields.lecture_id,
            content_url: fields.content_url,
            title: fields.title,
            image_url: fields.image_url,
        }),
        Err(e) => {
            warn!(object = %data.object_id, error = %e, "Skipping unreadable lecture pass");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SuitudyConfig;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const OWNER: &str = "0x00000000000000000000000000000000000000000000000000000000000000a1";

    fn listed_event(lecture: &str, instructor: &str, price: &str) -> Value {
        json!({
            "id": {"txDigest": format!("tx-{lecture}"), "eventSeq": "0"},
            "packageId": "0xp",
            "transactionModule": "suitudy",
            "sender": instructor,
            "type": "0xp::suitudy::LectureListed",
            "parsedJson": {
                "lecture_id": lecture,
                "title": format!("Lecture {lecture}"),
                "instructor": instructor,
                "price": price,
                "image_url": "https://img/event.png"
            }
        })
    }

    fn lecture_object(id: &str, description: &str) -> Value {
        json!({
            "data": {
                "objectId": id,
                "version": "3",
                "digest": "d",
                "content": {
                    "dataType": "moveObject",
                    "type": "0xp::suitudy::Lecture",
                    "fields": {"title": "t", "description": description, "image_url": "", "price": "1"}
                }
            }
        })
    }

    fn events(values: Vec<Value>) -> Vec<SuiEvent> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    #[test]
    fn test_listings_from_events() {
        let mut values = vec![
            listed_event("L1", "0xaa", "25000000000"),
            listed_event("L2", "0xbb", "5000000000"),
        ];
        values.push(json!({
            "id": {"txDigest": "tx-buy", "eventSeq": "0"},
            "packageId": "0xp",
            "transactionModule": "suitudy",
            "sender": "0xcc",
            "type": "0xp::suitudy::LecturePurchased",
            "parsedJson": {"lecture_id": "L1"}
        }));

        let listings = listings_from_events(&events(values));
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].id, ObjectId::new("L1"));
        assert_eq!(listings[0].price, Amount::from_tokens(25).unwrap());
        assert_eq!(listings[1].instructor, SuiAddress::new("0xbb"));
    }

    #[test]
    fn test_verify_listings_drops_deleted() {
        let listings = listings_from_events(&events(vec![
            listed_event("L1", "0xaa", "1"),
            listed_event("L2", "0xaa", "1"),
        ]));
        let objects: Vec<ObjectResponse> = vec![
            serde_json::from_value(lecture_object("L1", "Intro to Move")).unwrap(),
            serde_json::from_value(json!({"error": {"code": "deleted", "object_id": "L2"}})).unwrap(),
        ];

        let live = verify_listings(listings, &objects);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, ObjectId::new("L1"));
        assert_eq!(live[0].description, "Intro to Move");
        // empty object image keeps the event image
        assert_eq!(live[0].image_url, "https://img/event.png");
    }

    #[test]
    fn test_verify_listings_fills_missing_description() {
        let listings = listings_from_events(&events(vec![listed_event("L1", "0xaa", "1")]));
        let objects: Vec<ObjectResponse> =
            vec![serde_json::from_value(lecture_object("L1", "")).unwrap()];

        let live = verify_listings(listings, &objects);
        assert_eq!(live[0].description, NO_DESCRIPTION);
        assert_eq!(live[0].image_url, "https://img/event.png");
    }

    fn mock_marketplace(server: &MockServer) -> Marketplace {
        let config = SuitudyConfig::custom(&server.uri()).unwrap().without_retry();
        let client = Arc::new(LedgerClient::new(config).unwrap());
        Marketplace::new(client, ObjectId::new("0xp"))
    }

    fn rpc_result(result: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result}))
    }

    #[tokio::test]
    async fn test_instructor_listings() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "suix_queryEvents"})))
            .respond_with(rpc_result(json!({
                "data": [
                    listed_event("L1", "0xaa", "1000000000"),
                    listed_event("L2", "0xbb", "1000000000"),
                    listed_event("L3", "0xaa", "1000000000")
                ],
                "nextCursor": null,
                "hasNextPage": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "sui_multiGetObjects",
                "params": [["L1", "L3"]]
            })))
            .respond_with(rpc_result(json!([
                lecture_object("L1", "first"),
                {"error": {"code": "deleted", "object_id": "L3"}}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let marketplace = mock_marketplace(&server);
        let mine = marketplace
            .instructor_listings(&SuiAddress::new("0xAA"))
            .await
            .unwrap();

        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, ObjectId::new("L1"));
        assert_eq!(mine[0].description, "first");
    }

    #[tokio::test]
    async fn test_pass_for_lecture() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "suix_getOwnedObjects",
                "params": [OWNER, {"filter": {"StructType": "0xp::suitudy::LecturePass"}}]
            })))
            .respond_with(rpc_result(json!({
                "data": [
                    {"data": {"objectId": "P1", "version": "1", "digest": "d", "content": {
                        "dataType": "moveObject",
                        "fields": {"lecture_id": "L1", "content_url": "https://c/1", "title": "One"}
                    }}},
                    {"data": {"objectId": "P2", "version": "1", "digest": "d", "content": {
                        "dataType": "moveObject",
                        "fields": {"lecture_id": "L2", "content_url": "https://c/2"}
                    }}}
                ],
                "nextCursor": null,
                "hasNextPage": false
            })))
            .mount(&server)
            .await;

        let marketplace = mock_marketplace(&server);
        let owner = SuiAddress::new("0xa1");

        let pass = marketplace
            .pass_for_lecture(&owner, &ObjectId::new("L2"))
            .await
            .unwrap()
            .expect("pass for L2");
        assert_eq!(pass.id, ObjectId::new("P2"));
        assert_eq!(pass.content_url, "https://c/2");
        assert_eq!(pass.title, None);

        let missing = marketplace
            .pass_for_lecture(&owner, &ObjectId::new("L9"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_type_strings() {
        let client = Arc::new(LedgerClient::new(SuitudyConfig::testnet()).unwrap());
        let marketplace = Marketplace::new(client, ObjectId::new("0xp"));
        assert_eq!(marketplace.token_type(), "0xp::suitudy::SUITUDY");
        assert_eq!(marketplace.pass_type(), "0xp::suitudy::LecturePass");
    }
}
