use catalog_client::{
    college::College,
    course::Course,
    search::{filter, matches},
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn college(id: &str, name: &str, location: Option<&str>) -> College {
    College {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        location: location.map(str::to_string),
        established: None,
    }
}

fn course(id: &str, name: &str, code: &str, department: Option<&str>) -> Course {
    Course {
        id: id.to_string(),
        college: None,
        name: name.to_string(),
        code: code.to_string(),
        description: "not searched".to_string(),
        department: department.map(str::to_string),
        duration: None,
    }
}

#[test]
fn college_matches_location_ignoring_case() {
    let colleges: Vec<College> = serde_json::from_str(
        r#"[{"_id":"c1","name":"Tech U","location":"Metropolis"}]"#,
    )
    .unwrap();

    assert_eq!(filter(&colleges, "metro"), vec![0]);
    assert_eq!(filter(&colleges, "TECH"), vec![0]);
    assert_eq!(filter(&colleges, "zzz"), Vec::<usize>::new());
}

#[test]
fn college_description_is_not_searched() {
    let mut c = college("c1", "Tech U", None);
    c.description = "metropolitan campus".to_string();
    assert!(!matches(&c, "metro"));
}

#[test]
fn course_matches_name_code_and_department() {
    let courses = vec![
        course("k1", "Data Structures", "CS201", Some("Computer Science")),
        course("k2", "Organic Chemistry", "CH110", None),
        course("k3", "Poetry", "EN300", Some("English")),
    ];

    assert_eq!(filter(&courses, "cs2"), vec![0]);
    assert_eq!(filter(&courses, "chem"), vec![1]);
    assert_eq!(filter(&courses, "english"), vec![2]);
    assert_eq!(filter(&courses, "not searched"), Vec::<usize>::new());
    assert_eq!(filter(&courses, ""), vec![0, 1, 2]);
}

fn arb_college() -> impl Strategy<Value = College> {
    (
        "[a-zA-Z ]{0,12}",
        proptest::option::of("[a-zA-Z ]{0,12}"),
    )
        .prop_map(|(name, location)| college("id", &name, location.as_deref()))
}

fn arb_course() -> impl Strategy<Value = Course> {
    (
        "[a-zA-Z ]{0,12}",
        "[A-Z]{2}[0-9]{3}",
        proptest::option::of("[a-zA-Z ]{0,12}"),
    )
        .prop_map(|(name, code, dept)| course("id", &name, &code, dept.as_deref()))
}

proptest! {
    #[test]
    fn college_filter_is_exactly_the_matching_set(
        colleges in proptest::collection::vec(arb_college(), 0..20),
        term in "[a-zA-Z ]{0,4}",
    ) {
        let expected: Vec<usize> = colleges
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                let t = term.to_lowercase();
                c.name.to_lowercase().contains(&t)
                    || c.location.as_ref().is_some_and(|l| l.to_lowercase().contains(&t))
            })
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(filter(&colleges, &term), expected);
    }

    #[test]
    fn course_filter_is_exactly_the_matching_set(
        courses in proptest::collection::vec(arb_course(), 0..20),
        term in "[a-zA-Z0-9]{0,3}",
    ) {
        let expected: Vec<usize> = courses
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                let t = term.to_lowercase();
                c.name.to_lowercase().contains(&t)
                    || c.code.to_lowercase().contains(&t)
                    || c.department.as_ref().is_some_and(|d| d.to_lowercase().contains(&t))
            })
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(filter(&courses, &term), expected);
    }

    #[test]
    fn empty_term_keeps_everything(colleges in proptest::collection::vec(arb_college(), 0..20)) {
        prop_assert_eq!(filter(&colleges, ""), (0..colleges.len()).collect::<Vec<_>>());
    }

    #[test]
    fn refiltering_is_stable(
        colleges in proptest::collection::vec(arb_college(), 0..20),
        term in "[a-zA-Z]{0,3}",
    ) {
        let before = colleges.clone();
        let first = filter(&colleges, &term);
        let second = filter(&colleges, &term);
        prop_assert_eq!(first, second);
        prop_assert_eq!(colleges, before);
    }
}
