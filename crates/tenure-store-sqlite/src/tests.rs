//! Integration tests for `SqliteLedger` against an in-memory database.

use chrono::NaiveDate;
use tenure_core::{
  Error,
  directory::{HolderDirectory, ResourceCatalog},
  holder::{Holder, HolderKind},
  ledger::{AssignmentQuery, ReservationLedger, SupervisionLedger, SupervisionQuery},
  supervision::Theme,
};

use crate::SqliteLedger;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn res(code: &str) -> Holder {
  Holder::Researcher(code.into())
}

fn stu(code: &str) -> Holder {
  Holder::DoctoralStudent(code.into())
}

fn theme(text: &str) -> Theme {
  Theme::new(text).unwrap()
}

/// An in-memory ledger with a small registered cast and inventory.
async fn store() -> SqliteLedger {
  let s = SqliteLedger::open_in_memory().await.expect("in-memory ledger");

  s.register_researcher("R-1", "Ada Lovelace").await.unwrap();
  s.register_researcher("R-5", "Emmy Noether").await.unwrap();
  s.register_student("S-9", "Alan Kay").await.unwrap();
  s.register_student("S-100", "Barbara Liskov").await.unwrap();
  s.register_student("S-200", "Tony Hoare").await.unwrap();

  for code in ["INV-1", "INV-2", "INV-3", "INV-4"] {
    s.register_resource(code, "oscilloscope").await.unwrap();
  }

  s
}

// ─── Reservation: exclusivity ────────────────────────────────────────────────

#[tokio::test]
async fn reserve_opens_a_record() {
  let s = store().await;

  let a = s.reserve("INV-1", res("R-5"), d(2024, 1, 1)).await.unwrap();
  assert!(a.is_open());
  assert_eq!(a.resource_code, "INV-1");
  assert_eq!(a.holder, res("R-5"));

  let open = s.list_open_for("INV-1").await.unwrap();
  assert_eq!(open.len(), 1);
  assert_eq!(open[0].assignment_id, a.assignment_id);
}

#[tokio::test]
async fn busy_resource_rejects_either_holder_kind() {
  // Scenario A: the exclusivity domain spans both holder kinds.
  let s = store().await;

  s.reserve("INV-1", res("R-5"), d(2024, 1, 1)).await.unwrap();

  let err = s.reserve("INV-1", stu("S-9"), d(2024, 2, 1)).await.unwrap_err();
  assert!(matches!(err, Error::ResourceBusy { resource } if resource == "INV-1"));

  s.close("INV-1", &res("R-5"), d(2024, 3, 1)).await.unwrap();

  let a = s.reserve("INV-1", stu("S-9"), d(2024, 3, 2)).await.unwrap();
  assert!(a.is_open());
}

#[tokio::test]
async fn pair_is_recorded_at_most_once() {
  // Scenario B: closing does not free the pair for a second record.
  let s = store().await;

  s.reserve("INV-2", res("R-5"), d(2024, 1, 1)).await.unwrap();
  s.close("INV-2", &res("R-5"), d(2024, 2, 1)).await.unwrap();

  let err = s.reserve("INV-2", res("R-5"), d(2024, 2, 15)).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateAssignment { .. }));
}

#[tokio::test]
async fn reserve_checks_registries() {
  let s = store().await;

  let err = s.reserve("INV-1", res("R-404"), d(2024, 1, 1)).await.unwrap_err();
  assert!(matches!(err, Error::UnknownHolder(_)));

  let err = s.reserve("NOPE", res("R-5"), d(2024, 1, 1)).await.unwrap_err();
  assert!(matches!(err, Error::UnknownResource(code) if code == "NOPE"));
}

// ─── Reservation: closing ────────────────────────────────────────────────────

#[tokio::test]
async fn close_before_assignment_date_is_rejected() {
  // Scenario C.
  let s = store().await;

  s.reserve("INV-3", res("R-5"), d(2024, 1, 1)).await.unwrap();

  let err = s
    .close("INV-3", &res("R-5"), d(2023, 12, 31))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidInterval { .. }));

  // The rejected close must not have touched the record.
  let open = s.list_open_for("INV-3").await.unwrap();
  assert_eq!(open.len(), 1);
}

#[tokio::test]
async fn same_day_return_is_valid() {
  let s = store().await;

  s.reserve("INV-3", res("R-5"), d(2024, 1, 1)).await.unwrap();
  let a = s.close("INV-3", &res("R-5"), d(2024, 1, 1)).await.unwrap();

  assert_eq!(a.returned_on, Some(d(2024, 1, 1)));
  assert!(s.list_open_for("INV-3").await.unwrap().is_empty());
}

#[tokio::test]
async fn close_missing_assignment_errors() {
  let s = store().await;
  let err = s.close("INV-1", &res("R-5"), d(2024, 1, 1)).await.unwrap_err();
  assert!(matches!(err, Error::AssignmentNotFound { .. }));
}

// ─── Reservation: reopen ─────────────────────────────────────────────────────

#[tokio::test]
async fn reopen_restores_the_open_state() {
  let s = store().await;

  s.reserve("INV-1", res("R-5"), d(2024, 1, 1)).await.unwrap();
  s.close("INV-1", &res("R-5"), d(2024, 2, 1)).await.unwrap();
  assert!(s.list_open_for("INV-1").await.unwrap().is_empty());

  let a = s.reopen("INV-1", &res("R-5")).await.unwrap();
  assert!(a.is_open());
  assert_eq!(s.list_open_for("INV-1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn reopen_is_blocked_while_another_holder_is_active() {
  let s = store().await;

  s.reserve("INV-1", res("R-5"), d(2024, 1, 1)).await.unwrap();
  s.close("INV-1", &res("R-5"), d(2024, 2, 1)).await.unwrap();
  s.reserve("INV-1", stu("S-9"), d(2024, 3, 1)).await.unwrap();

  let err = s.reopen("INV-1", &res("R-5")).await.unwrap_err();
  assert!(matches!(err, Error::ResourceBusy { .. }));
}

// ─── Reservation: delete ─────────────────────────────────────────────────────

#[tokio::test]
async fn delete_is_unconditional_and_frees_the_pair() {
  let s = store().await;

  s.reserve("INV-1", res("R-5"), d(2024, 1, 1)).await.unwrap();
  s.delete("INV-1", &res("R-5")).await.unwrap();

  assert!(s.list_open_for("INV-1").await.unwrap().is_empty());

  // The administrative escape hatch removes history, so the pair may be
  // recorded again.
  s.reserve("INV-1", res("R-5"), d(2024, 2, 1)).await.unwrap();
}

#[tokio::test]
async fn delete_missing_assignment_errors() {
  let s = store().await;
  let err = s.delete("INV-1", &res("R-5")).await.unwrap_err();
  assert!(matches!(err, Error::AssignmentNotFound { .. }));
}

// ─── Reservation: reads ──────────────────────────────────────────────────────

#[tokio::test]
async fn open_rows_never_exceed_one_per_resource() {
  let s = store().await;

  s.reserve("INV-1", res("R-5"), d(2024, 1, 1)).await.unwrap();
  s.close("INV-1", &res("R-5"), d(2024, 2, 1)).await.unwrap();
  s.reserve("INV-1", stu("S-9"), d(2024, 3, 1)).await.unwrap();
  s.reserve("INV-2", res("R-1"), d(2024, 1, 1)).await.unwrap();
  s.close("INV-2", &res("R-1"), d(2024, 1, 1)).await.unwrap();
  s.reserve("INV-2", stu("S-100"), d(2024, 2, 1)).await.unwrap();
  s.close("INV-2", &stu("S-100"), d(2024, 3, 1)).await.unwrap();

  for code in ["INV-1", "INV-2", "INV-3", "INV-4"] {
    assert!(s.list_open_for(code).await.unwrap().len() <= 1, "{code}");
  }
}

#[tokio::test]
async fn list_open_is_idempotent() {
  let s = store().await;
  s.reserve("INV-1", res("R-5"), d(2024, 1, 1)).await.unwrap();

  let first = s.list_open_for("INV-1").await.unwrap();
  let second = s.list_open_for("INV-1").await.unwrap();

  let ids = |v: &[tenure_core::assignment::Assignment]| {
    v.iter().map(|a| a.assignment_id).collect::<Vec<_>>()
  };
  assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn history_filters_by_resource_and_holder() {
  let s = store().await;

  s.reserve("INV-1", res("R-5"), d(2024, 1, 1)).await.unwrap();
  s.close("INV-1", &res("R-5"), d(2024, 2, 1)).await.unwrap();
  s.reserve("INV-1", stu("S-9"), d(2024, 3, 1)).await.unwrap();
  s.reserve("INV-2", res("R-5"), d(2024, 1, 1)).await.unwrap();

  let by_resource = s
    .assignment_history(&AssignmentQuery {
      resource: Some("INV-1".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_resource.len(), 2);

  let by_holder = s
    .assignment_history(&AssignmentQuery {
      holder_kind: Some(HolderKind::Researcher),
      holder_code: Some("R-5".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_holder.len(), 2);
  assert!(by_holder.iter().all(|a| a.holder == res("R-5")));

  let limited = s
    .assignment_history(&AssignmentQuery {
      limit: Some(1),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(limited.len(), 1);
}

// ─── Reservation: concurrency ────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_reserves_have_exactly_one_winner() {
  // Scenario E: both succeeding would be a double assignment.
  let s = store().await;

  let (a, b) = tokio::join!(
    s.reserve("INV-4", res("R-5"), d(2024, 1, 1)),
    s.reserve("INV-4", stu("S-9"), d(2024, 1, 1)),
  );

  let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
  assert_eq!(successes, 1, "exactly one reserve may win");

  let err = if a.is_err() {
    a.unwrap_err()
  } else {
    b.unwrap_err()
  };
  assert!(matches!(
    err,
    Error::ResourceBusy { .. } | Error::ConcurrentConflict
  ));

  assert_eq!(s.list_open_for("INV-4").await.unwrap().len(), 1);
}

// ─── Supervision ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn researcher_supervises_one_student_at_a_time() {
  // Scenario D.
  let s = store().await;

  s.create_supervision("R-1", "S-100", d(2020, 1, 1), theme("Thesis A"))
    .await
    .unwrap();

  let err = s
    .create_supervision("R-1", "S-200", d(2020, 2, 1), theme("Thesis B"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ResearcherAlreadySupervising { researcher } if researcher == "R-1"));

  s.close_supervision("R-1", "S-100", d(2022, 1, 1)).await.unwrap();

  s.create_supervision("R-1", "S-200", d(2022, 2, 1), theme("Thesis B"))
    .await
    .unwrap();
}

#[tokio::test]
async fn student_has_one_supervisor_at_a_time() {
  let s = store().await;

  s.create_supervision("R-1", "S-100", d(2020, 1, 1), theme("Thesis A"))
    .await
    .unwrap();

  let err = s
    .create_supervision("R-5", "S-100", d(2020, 2, 1), theme("Thesis B"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::StudentAlreadySupervised { student } if student == "S-100"));
}

#[tokio::test]
async fn supervision_pair_is_recorded_at_most_once() {
  let s = store().await;

  s.create_supervision("R-1", "S-100", d(2020, 1, 1), theme("Thesis A"))
    .await
    .unwrap();
  s.close_supervision("R-1", "S-100", d(2021, 1, 1)).await.unwrap();

  let err = s
    .create_supervision("R-1", "S-100", d(2022, 1, 1), theme("Thesis A, again"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SupervisionAlreadyRecorded { .. }));
}

#[tokio::test]
async fn create_supervision_checks_the_directory() {
  let s = store().await;

  let err = s
    .create_supervision("R-404", "S-100", d(2020, 1, 1), theme("Thesis"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UnknownHolder(Holder::Researcher(code)) if code == "R-404"));

  let err = s
    .create_supervision("R-1", "S-404", d(2020, 1, 1), theme("Thesis"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UnknownHolder(Holder::DoctoralStudent(code)) if code == "S-404"));
}

#[tokio::test]
async fn close_supervision_validates_the_interval() {
  let s = store().await;

  s.create_supervision("R-1", "S-100", d(2020, 6, 1), theme("Thesis A"))
    .await
    .unwrap();

  let err = s
    .close_supervision("R-1", "S-100", d(2020, 5, 31))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidInterval { .. }));

  let closed = s.close_supervision("R-1", "S-100", d(2020, 6, 1)).await.unwrap();
  assert_eq!(closed.ended_on, Some(d(2020, 6, 1)));
}

#[tokio::test]
async fn reopen_supervision_revalidates_both_slots() {
  let s = store().await;

  s.create_supervision("R-1", "S-100", d(2020, 1, 1), theme("Thesis A"))
    .await
    .unwrap();
  s.close_supervision("R-1", "S-100", d(2021, 1, 1)).await.unwrap();
  s.create_supervision("R-1", "S-200", d(2021, 2, 1), theme("Thesis B"))
    .await
    .unwrap();

  // The researcher slot is taken again, so the old pair cannot reopen.
  let err = s.reopen_supervision("R-1", "S-100").await.unwrap_err();
  assert!(matches!(err, Error::ResearcherAlreadySupervising { .. }));

  s.close_supervision("R-1", "S-200", d(2022, 1, 1)).await.unwrap();
  let reopened = s.reopen_supervision("R-1", "S-100").await.unwrap();
  assert!(reopened.is_open());
}

#[tokio::test]
async fn reopen_supervision_respects_the_student_slot() {
  let s = store().await;

  s.create_supervision("R-1", "S-100", d(2020, 1, 1), theme("Thesis A"))
    .await
    .unwrap();
  s.close_supervision("R-1", "S-100", d(2021, 1, 1)).await.unwrap();
  s.create_supervision("R-5", "S-100", d(2021, 2, 1), theme("Thesis B"))
    .await
    .unwrap();

  let err = s.reopen_supervision("R-1", "S-100").await.unwrap_err();
  assert!(matches!(err, Error::StudentAlreadySupervised { .. }));
}

#[tokio::test]
async fn update_theme_replaces_the_text() {
  let s = store().await;

  s.create_supervision("R-1", "S-100", d(2020, 1, 1), theme("Working title"))
    .await
    .unwrap();

  let updated = s
    .update_theme("R-1", "S-100", theme("Final title"))
    .await
    .unwrap();
  assert_eq!(updated.theme.as_str(), "Final title");

  let open = s.open_for_researcher("R-1").await.unwrap();
  assert_eq!(open[0].theme.as_str(), "Final title");
}

#[tokio::test]
async fn delete_supervision_is_unconditional() {
  let s = store().await;

  s.create_supervision("R-1", "S-100", d(2020, 1, 1), theme("Thesis A"))
    .await
    .unwrap();
  s.delete_supervision("R-1", "S-100").await.unwrap();

  assert!(s.open_for_researcher("R-1").await.unwrap().is_empty());

  // As with assignments, deletion erases history entirely.
  s.create_supervision("R-1", "S-100", d(2021, 1, 1), theme("Thesis A"))
    .await
    .unwrap();
}

#[tokio::test]
async fn open_supervisions_never_exceed_one_per_party() {
  let s = store().await;

  s.create_supervision("R-1", "S-100", d(2020, 1, 1), theme("Thesis A"))
    .await
    .unwrap();
  s.close_supervision("R-1", "S-100", d(2021, 1, 1)).await.unwrap();
  s.create_supervision("R-1", "S-200", d(2021, 2, 1), theme("Thesis B"))
    .await
    .unwrap();
  s.create_supervision("R-5", "S-100", d(2021, 3, 1), theme("Thesis C"))
    .await
    .unwrap();

  for code in ["R-1", "R-5"] {
    assert!(s.open_for_researcher(code).await.unwrap().len() <= 1, "{code}");
  }
  for code in ["S-9", "S-100", "S-200"] {
    assert!(s.open_for_student(code).await.unwrap().len() <= 1, "{code}");
  }
}

#[tokio::test]
async fn supervision_history_filters() {
  let s = store().await;

  s.create_supervision("R-1", "S-100", d(2020, 1, 1), theme("Thesis A"))
    .await
    .unwrap();
  s.close_supervision("R-1", "S-100", d(2021, 1, 1)).await.unwrap();
  s.create_supervision("R-1", "S-200", d(2021, 2, 1), theme("Thesis B"))
    .await
    .unwrap();

  let for_researcher = s
    .supervision_history(&SupervisionQuery {
      researcher: Some("R-1".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(for_researcher.len(), 2);

  let for_student = s
    .supervision_history(&SupervisionQuery {
      student: Some("S-200".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(for_student.len(), 1);
  assert_eq!(for_student[0].student_code, "S-200");
}

#[tokio::test]
async fn concurrent_supervision_creates_have_one_winner() {
  let s = store().await;

  let (a, b) = tokio::join!(
    s.create_supervision("R-1", "S-100", d(2020, 1, 1), theme("Thesis A")),
    s.create_supervision("R-1", "S-200", d(2020, 1, 1), theme("Thesis B")),
  );

  let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
  assert_eq!(successes, 1);

  let err = if a.is_err() {
    a.unwrap_err()
  } else {
    b.unwrap_err()
  };
  assert!(matches!(
    err,
    Error::ResearcherAlreadySupervising { .. } | Error::ConcurrentConflict
  ));
}

// ─── Registries ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_lookup_holder() {
  let s = store().await;

  let record = s.lookup_holder(&res("R-1")).await.unwrap().unwrap();
  assert_eq!(record.display_name, "Ada Lovelace");

  assert!(s.lookup_holder(&res("R-404")).await.unwrap().is_none());
  // Holder kinds are disjoint namespaces.
  assert!(s.lookup_holder(&stu("R-1")).await.unwrap().is_none());
}

#[tokio::test]
async fn registering_twice_updates_the_display_name() {
  let s = store().await;

  s.register_researcher("R-1", "Ada King, Countess of Lovelace")
    .await
    .unwrap();

  let record = s.lookup_holder(&res("R-1")).await.unwrap().unwrap();
  assert_eq!(record.display_name, "Ada King, Countess of Lovelace");

  assert_eq!(s.list_researchers().await.unwrap().len(), 2);
}

#[tokio::test]
async fn resource_catalog_round_trip() {
  let s = store().await;

  let record = s.lookup_resource("INV-1").await.unwrap().unwrap();
  assert_eq!(record.label, "oscilloscope");
  assert!(s.lookup_resource("NOPE").await.unwrap().is_none());

  s.register_resource("INV-1", "storage oscilloscope").await.unwrap();
  let record = s.lookup_resource("INV-1").await.unwrap().unwrap();
  assert_eq!(record.label, "storage oscilloscope");

  assert_eq!(s.list_resources().await.unwrap().len(), 4);
}
