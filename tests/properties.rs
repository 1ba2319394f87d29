use proptest::prelude::*;
use toxic_repos::dataset::decode;
use toxic_repos::query::filter;
use toxic_repos::session::FetchOutcome;
use toxic_repos::view::{Paginator, PAGE_SIZE};
use toxic_repos::{DataSourceMode, Dataset, FilterCriteria, Record, SearchSession};

const HEADER: &str = "id,name,description,problem_type,datetime,commit_link";

fn field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.:/_-]{0,20}"
}

fn required_field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 ,._-]{0,15}"
}

fn row() -> impl Strategy<Value = [String; 6]> {
    (
        "[a-z0-9]{1,6}",
        required_field(),
        field(),
        "[a-z_]{0,12}",
        "20[0-9]{2}-[01][0-9]-[0-3][0-9]T00:00:00Z",
        field(),
    )
        .prop_map(|(id, name, description, problem_type, datetime, link)| {
            [id, name, description, problem_type, datetime, link]
        })
}

fn to_csv(rows: &[[String; 6]]) -> String {
    let mut csv = format!("{}\n", HEADER);
    for row in rows {
        let quoted: Vec<String> = row.iter().map(|v| format!("\"{}\"", v)).collect();
        csv.push_str(&quoted.join(","));
        csv.push('\n');
    }
    csv
}

fn record() -> impl Strategy<Value = Record> {
    row().prop_map(|[id, name, description, problem_type, datetime, link]| Record {
        id,
        name,
        description,
        problem_type,
        datetime,
        commit_link: (!link.is_empty()).then_some(link),
    })
}

proptest! {
    #[test]
    fn decoding_recovers_trimmed_fields(rows in prop::collection::vec(row(), 0..20)) {
        let records = decode(&to_csv(&rows));
        prop_assert_eq!(records.len(), rows.len());

        for (record, row) in records.iter().zip(&rows) {
            prop_assert_eq!(&record.id, row[0].trim());
            prop_assert_eq!(&record.name, row[1].trim());
            prop_assert_eq!(&record.description, row[2].trim());
            prop_assert_eq!(&record.problem_type, row[3].trim());
            prop_assert_eq!(&record.datetime, row[4].trim());
            let link = row[5].trim();
            prop_assert_eq!(record.commit_link.as_deref(), (!link.is_empty()).then_some(link));
        }
    }

    #[test]
    fn incomplete_rows_never_decoded(
        rows in prop::collection::vec(("[a-z ]{0,3}", "[a-z ]{0,3}", field()), 0..20)
    ) {
        let mut csv = format!("{}\n", HEADER);
        for (id, name, description) in &rows {
            csv.push_str(&format!("\"{}\",\"{}\",\"{}\",malware,2024-01-01,\n", id, name, description));
        }

        let expected = rows
            .iter()
            .filter(|(id, name, _)| !id.trim().is_empty() && !name.trim().is_empty())
            .count();
        let records = decode(&csv);
        prop_assert_eq!(records.len(), expected);
        prop_assert!(records.iter().all(|r| !r.id.is_empty() && !r.name.is_empty()));
    }

    #[test]
    fn filtering_preserves_order_and_matches_term(
        records in prop::collection::vec(record(), 0..40),
        term in "[a-zA-Z]{1,2}",
    ) {
        let dataset = Dataset::new(records);
        let criteria = FilterCriteria::new().with_search(&term);
        let indices = filter(&dataset, &criteria);

        prop_assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));

        let needle = term.to_lowercase();
        for &index in &indices {
            let record = &dataset.records()[index];
            prop_assert!(
                [&record.name, &record.description, &record.problem_type]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            );
        }
    }

    #[test]
    fn exhausting_yields_ceil_windows(total in 0usize..500) {
        let mut paginator = Paginator::new();
        let mut windows = usize::from(!paginator.page_range(0, total).is_empty());
        while paginator.advance(total).is_some() {
            windows += 1;
        }

        prop_assert_eq!(windows, total.div_ceil(PAGE_SIZE));
        let cursor = paginator.clone();
        prop_assert!(paginator.advance(total).is_none());
        prop_assert_eq!(paginator, cursor);
    }

    #[test]
    fn reset_is_idempotent(total in 0usize..200, steps in 0usize..12) {
        let mut paginator = Paginator::new();
        for _ in 0..steps {
            paginator.advance(total);
        }

        paginator.reset();
        let once = paginator.clone();
        paginator.reset();
        prop_assert_eq!(&paginator, &once);
        prop_assert_eq!(once, Paginator::new());
    }

    #[test]
    fn only_latest_fetch_applies(
        order in (1usize..6).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let mut session = SearchSession::new(DataSourceMode::Translated);
        let tickets: Vec<_> = order.iter().map(|_| session.begin_fetch()).collect();
        let latest = tickets.len() - 1;

        for &i in &order {
            // Ticket i carries a dataset of i + 1 records
            let mut csv = format!("{}\n", HEADER);
            for n in 0..=i {
                csv.push_str(&format!("{n},repo-{n},,malware,2024-01-01,\n"));
            }

            let outcome = session.complete_success(tickets[i], &csv);
            if i == latest {
                prop_assert_eq!(outcome, FetchOutcome::Applied { records: latest + 1 });
            } else {
                prop_assert_eq!(outcome, FetchOutcome::Stale);
            }
        }

        prop_assert_eq!(session.dataset().len(), latest + 1);
        prop_assert!(!session.is_loading());
    }
}
