use paperworks_atoms::media::{ImageList, ImageRecord, ReorderRequest};
use proptest::prelude::*;
use proptest::test_runner::Config;

#[derive(Debug, Clone)]
enum Op {
    Append,
    Remove(usize),
    RemoveUnknown,
    Reorder(i64, i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Append),
        2 => (0_usize..32).prop_map(Op::Remove),
        1 => Just(Op::RemoveUnknown),
        3 => (-4_i64..24, -4_i64..24).prop_map(|(from, to)| Op::Reorder(from, to)),
    ]
}

fn record(id: &str) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        url: format!("https://assets.example/{id}.png"),
        alt_text: None,
        sequence: 0,
        is_active: true,
    }
}

fn ids(list: &ImageList) -> Vec<String> {
    list.iter().map(|r| r.id.clone()).collect()
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

proptest! {
    #![proptest_config(Config::with_cases(256))]
    #[test]
    fn any_operation_sequence_keeps_the_list_dense(ops in prop::collection::vec(op(), 0..48)) {
        let mut list = ImageList::new();
        // plain Vec mirror of the expected order
        let mut expected: Vec<String> = Vec::new();
        let mut minted = 0_usize;

        for op in ops {
            match op {
                Op::Append => {
                    let id = format!("img-{minted}");
                    minted += 1;
                    list.append(record(&id));
                    expected.push(id);
                }
                Op::Remove(pick) => {
                    if expected.is_empty() {
                        continue;
                    }
                    let id = expected.remove(pick % expected.len());
                    prop_assert!(list.remove(&id).is_some());
                }
                Op::RemoveUnknown => {
                    let before = list.clone();
                    prop_assert!(list.remove("never-stored").is_none());
                    prop_assert_eq!(&list, &before);
                }
                Op::Reorder(from, to) => {
                    let before = sorted(ids(&list));
                    let moved = match (ReorderRequest { from, to }).indices() {
                        Some((from, to)) => {
                            let moved = list.reorder(from, to);
                            if moved {
                                let id = expected.remove(from);
                                expected.insert(to, id);
                            }
                            moved
                        }
                        None => false,
                    };
                    prop_assert_eq!(sorted(ids(&list)), before);
                    if !moved {
                        prop_assert_eq!(ids(&list), expected.clone());
                    }
                }
            }

            prop_assert_eq!(ids(&list), expected.clone());
            let sequences: Vec<u32> = list.iter().map(|r| r.sequence).collect();
            let dense: Vec<u32> = (0..list.len() as u32).collect();
            prop_assert_eq!(sequences, dense);
            prop_assert_eq!(
                list.primary_image_url(),
                list.iter().find(|r| r.sequence == 0).map(|r| r.url.as_str())
            );
        }
    }

    #[test]
    fn stored_sequences_with_gaps_and_ties_load_dense(sequences in prop::collection::vec(0_u32..40, 0..20)) {
        let records: Vec<ImageRecord> = sequences
            .iter()
            .enumerate()
            .map(|(i, sequence)| ImageRecord { sequence: *sequence, ..record(&format!("r{i}")) })
            .collect();
        let mut by_sequence = records.clone();
        by_sequence.sort_by_key(|r| r.sequence);

        let list = ImageList::from_records(records);

        let order: Vec<String> = by_sequence.into_iter().map(|r| r.id).collect();
        prop_assert_eq!(ids(&list), order);
        let dense: Vec<u32> = (0..list.len() as u32).collect();
        prop_assert_eq!(list.iter().map(|r| r.sequence).collect::<Vec<_>>(), dense);
    }
}
