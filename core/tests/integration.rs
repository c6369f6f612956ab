//! Full pet lifecycle against the live mock server.
//!
//! Starts the mock server on a random port, then walks one pet through
//! create, fetch, update, find-by-status and delete over real HTTP, checking
//! every response with the assertion helpers.

mod common;

use petstore_harness::assertions::*;
use petstore_harness::petstore::{
    NewPet, PetStatus, EXPECTED_PET_KEYS, FIND_BY_STATUS, PET, PET_BY_ID, STATUS_NOT_FOUND,
    STATUS_OK,
};
use petstore_harness::{Dispatcher, HarnessConfig, JsonExt, Payload, Result};

#[test]
fn pet_lifecycle() -> Result<()> {
    // Step 1: start mock server on a random port.
    common::init_tracing();
    let addr = common::spawn_petstore();
    let dispatcher = Dispatcher::new(HarnessConfig::new(&format!("http://{addr}")));

    // Step 2: pending list holds only the seeded pets.
    let response = dispatcher.get(FIND_BY_STATUS, Some(PetStatus::Pending.query()))?;
    assert_status(&response, STATUS_OK)?;
    assert_each_item_field_equals(&response, "status", "pending")?;
    let seeded_pending = response.json().unwrap().as_array().unwrap().len();

    // Step 3: create a pending pet.
    let pet = NewPet::named("Integration").with_status(PetStatus::Pending);
    let response = dispatcher.post(PET, pet.to_payload()?)?;
    assert_status(&response, STATUS_OK)?;
    assert_has_keys(&response, &EXPECTED_PET_KEYS)?;
    assert_field_nonzero(&response, "id")?;
    let id = response.json().unwrap().i64_field("id").unwrap();
    let by_id = || Payload::new().with("petId", id);

    // Step 4: fetch it back.
    let response = dispatcher.get(PET_BY_ID, Some(by_id()))?;
    assert_status(&response, STATUS_OK)?;
    assert_field_equals(&response, "name", "Integration", "fetched name")?;

    // Step 5: it shows up in the pending list.
    let response = dispatcher.get(FIND_BY_STATUS, Some(PetStatus::Pending.query()))?;
    let pending = response.json().unwrap();
    assert_eq!(pending.as_array().unwrap().len(), seeded_pending + 1);

    // Step 6: rename and mark sold.
    let mut updated = pet.with_id(id).with_status(PetStatus::Sold);
    updated.name = "new name".to_string();
    let response = dispatcher.put(PET, updated.to_payload()?)?;
    assert_status(&response, STATUS_OK)?;
    assert_field_equals(&response, "name", "new name", "Failed to update the pet's name")?;
    assert_field_equals(&response, "status", "sold", "Failed to update the pet's status")?;

    // Step 7: pending list is back to the seeded pets.
    let response = dispatcher.get(FIND_BY_STATUS, Some(PetStatus::Pending.query()))?;
    let pending = response.json().unwrap();
    assert_eq!(pending.as_array().unwrap().len(), seeded_pending);

    // Step 8: delete.
    let response = dispatcher.delete(PET_BY_ID, Some(by_id()))?;
    assert_status(&response, STATUS_OK)?;

    // Step 9: fetch after delete is not found.
    let response = dispatcher.get(PET_BY_ID, Some(by_id()))?;
    assert_status(&response, STATUS_NOT_FOUND)?;

    // Step 10: delete again is not found.
    let response = dispatcher.delete(PET_BY_ID, Some(by_id()))?;
    assert_status(&response, STATUS_NOT_FOUND)?;
    Ok(())
}
