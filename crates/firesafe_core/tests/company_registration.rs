use chrono::{NaiveDate, Utc};
use firesafe_core::db::{open_db_in_memory, DbError};
use firesafe_core::{
    Company, CompanyId, CompanyRegistration, CompanyRepository, CompanyService,
    CompanyServiceError, CompanyValidationError, DraftCompany, EquipmentItem, ErrorKind,
    ExtinguisherAgent, Measure, OwnerId, RepoError, RepoResult, SqliteCompanyRepository,
};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn owner(name: &str) -> OwnerId {
    OwnerId::new(name).unwrap()
}

fn registration(name: &str) -> CompanyRegistration {
    CompanyRegistration {
        name: name.to_string(),
        address: "1 Main St".to_string(),
        city: Some("Springfield".to_string()),
        registered_at: Some(date(2023, 1, 1)),
    }
}

fn filled_draft() -> DraftCompany {
    let mut draft = DraftCompany::new();
    draft.add(
        EquipmentItem::extinguisher(
            ExtinguisherAgent::Co2,
            Measure::Kilograms(5),
            2,
            date(2023, 1, 1),
        )
        .unwrap(),
    );
    draft.add(EquipmentItem::hose(Measure::Meters(20), 1, date(2023, 1, 1)).unwrap());
    draft
}

#[test]
fn register_commits_draft_and_clears_it() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CompanyService::new(SqliteCompanyRepository::try_new(&mut conn).unwrap());
    let alice = owner("alice");
    let mut draft = filled_draft();

    let id = service
        .register_company(&alice, &registration("Acme"), &mut draft)
        .unwrap();

    assert!(draft.is_empty());
    let stored = service.get_company(id, &alice).unwrap().unwrap();
    assert_eq!(stored.name(), "Acme");
    assert_eq!(stored.equipment().len(), 2);
    assert_eq!(stored.registered_at(), date(2023, 1, 1));
}

#[test]
fn register_defaults_registration_date_to_today() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CompanyService::new(SqliteCompanyRepository::try_new(&mut conn).unwrap());
    let alice = owner("alice");
    let before = Utc::now().date_naive();

    let id = service
        .register_company(
            &alice,
            &CompanyRegistration {
                name: "Acme".to_string(),
                address: "1 Main St".to_string(),
                ..CompanyRegistration::default()
            },
            &mut DraftCompany::new(),
        )
        .unwrap();

    let after = Utc::now().date_naive();
    let stored = service.get_company(id, &alice).unwrap().unwrap();
    assert!(before <= stored.registered_at() && stored.registered_at() <= after);
    assert!(stored.equipment().is_empty());
    assert_eq!(stored.city(), None);
}

#[test]
fn invalid_registration_keeps_draft() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CompanyService::new(SqliteCompanyRepository::try_new(&mut conn).unwrap());
    let alice = owner("alice");
    let mut draft = filled_draft();

    let err = service
        .register_company(&alice, &registration("   "), &mut draft)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(
        err,
        CompanyServiceError::Validation(CompanyValidationError::BlankName)
    ));
    assert_eq!(draft.len(), 2);
    assert!(service.list_companies(&alice).unwrap().is_empty());
}

#[test]
fn duplicate_registration_keeps_draft() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CompanyService::new(SqliteCompanyRepository::try_new(&mut conn).unwrap());
    let alice = owner("alice");
    service
        .register_company(&alice, &registration("Acme"), &mut DraftCompany::new())
        .unwrap();

    let mut draft = filled_draft();
    let err = service
        .register_company(&alice, &registration("Acme"), &mut draft)
        .unwrap_err();

    assert!(matches!(err, CompanyServiceError::DuplicateName(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(draft.len(), 2);
}

#[test]
fn store_failure_is_connection_kind_and_keeps_draft() {
    let mut service = CompanyService::new(UnreachableRepository);
    let mut draft = filled_draft();

    let err = service
        .register_company(&owner("alice"), &registration("Acme"), &mut draft)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
    assert_eq!(draft.len(), 2);

    let delete_err = service.delete_company("Acme", &owner("alice")).unwrap_err();
    assert_eq!(delete_err.kind(), ErrorKind::Connection);
}

#[test]
fn append_equipment_moves_draft_into_company() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CompanyService::new(SqliteCompanyRepository::try_new(&mut conn).unwrap());
    let alice = owner("alice");
    let id = service
        .register_company(&alice, &registration("Acme"), &mut filled_draft())
        .unwrap();

    let mut draft = DraftCompany::new();
    service.append_equipment(id, &alice, &mut draft).unwrap();

    draft.add(EquipmentItem::hose(Measure::Meters(30), 2, date(2023, 3, 1)).unwrap());
    service.append_equipment(id, &alice, &mut draft).unwrap();
    assert!(draft.is_empty());

    let stored = service.get_company(id, &alice).unwrap().unwrap();
    assert_eq!(stored.equipment().len(), 3);
    assert_eq!(stored.equipment()[2].capacity_or_length(), Measure::Meters(30));
}

#[test]
fn append_to_foreign_company_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CompanyService::new(SqliteCompanyRepository::try_new(&mut conn).unwrap());
    let id = service
        .register_company(&owner("alice"), &registration("Acme"), &mut DraftCompany::new())
        .unwrap();

    let mut draft = filled_draft();
    let err = service
        .append_equipment(id, &owner("bob"), &mut draft)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(draft.len(), 2);
}

#[test]
fn empty_append_still_requires_an_owned_company() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CompanyService::new(SqliteCompanyRepository::try_new(&mut conn).unwrap());
    let alice = owner("alice");
    let id = service
        .register_company(&alice, &registration("Acme"), &mut DraftCompany::new())
        .unwrap();

    let foreign = service
        .append_equipment(id, &owner("bob"), &mut DraftCompany::new())
        .unwrap_err();
    assert!(matches!(foreign, CompanyServiceError::CompanyNotFound(found) if found == id));

    let unknown = service
        .append_equipment(Uuid::new_v4(), &alice, &mut DraftCompany::new())
        .unwrap_err();
    assert_eq!(unknown.kind(), ErrorKind::NotFound);

    service
        .append_equipment(id, &alice, &mut DraftCompany::new())
        .unwrap();
    assert!(service.get_company(id, &alice).unwrap().unwrap().equipment().is_empty());
}

#[test]
fn delete_reports_counts_without_erroring_on_absence() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CompanyService::new(SqliteCompanyRepository::try_new(&mut conn).unwrap());
    let alice = owner("alice");
    let bob = owner("bob");
    let id = service
        .register_company(&alice, &registration("Acme"), &mut filled_draft())
        .unwrap();
    service
        .register_company(&alice, &registration("Other"), &mut DraftCompany::new())
        .unwrap();

    let foreign = service.delete_company("Acme", &bob).unwrap();
    assert!(foreign.is_not_found());

    let deleted = service.delete_company("Acme", &alice).unwrap();
    assert_eq!(deleted.deleted_count, 1);
    assert!(service.get_company(id, &alice).unwrap().is_none());

    let again = service.delete_company("Acme", &alice).unwrap();
    assert!(again.is_not_found());

    let by_missing_id = service
        .delete_company_by_id(Uuid::new_v4(), &alice)
        .unwrap();
    assert!(by_missing_id.is_not_found());
    assert_eq!(service.list_companies(&alice).unwrap().len(), 1);
}

struct UnreachableRepository;

fn unreachable_store() -> RepoError {
    RepoError::Db(DbError::Sqlite(rusqlite::Error::InvalidQuery))
}

impl CompanyRepository for UnreachableRepository {
    fn insert_company(&mut self, _company: &Company) -> RepoResult<CompanyId> {
        Err(unreachable_store())
    }

    fn find_by_owner(&self, _owner: &OwnerId) -> RepoResult<Vec<Company>> {
        Err(unreachable_store())
    }

    fn get_company(&self, _id: CompanyId, _owner: &OwnerId) -> RepoResult<Option<Company>> {
        Err(unreachable_store())
    }

    fn append_equipment(
        &mut self,
        _id: CompanyId,
        _owner: &OwnerId,
        _items: &[EquipmentItem],
    ) -> RepoResult<()> {
        Err(unreachable_store())
    }

    fn delete_by_name_and_owner(&mut self, _name: &str, _owner: &OwnerId) -> RepoResult<usize> {
        Err(unreachable_store())
    }

    fn delete_by_id_and_owner(&mut self, _id: CompanyId, _owner: &OwnerId) -> RepoResult<usize> {
        Err(unreachable_store())
    }
}
