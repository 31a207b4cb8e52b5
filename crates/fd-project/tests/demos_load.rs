use std::path::PathBuf;

#[test]
fn demo_scenarios_load_and_validate() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("demos");
    path.push("scenarios");
    path.push("plant_week.yaml");

    let file = fd_project::load_yaml(&path).expect("demo scenario file should load");
    assert_eq!(file.scenarios.len(), 4);
    assert_eq!(file.sweeps.len(), 1);
    assert!(file.profile("plant-b").is_some());
    assert!(file.profile("literature").is_some());
}
