use std::path::{Path, PathBuf};

/// Every `.json` file under `folder_path`, sorted.
pub fn read_scenario_folder(folder_path: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder_path)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            if path.extension().is_some_and(|extension| extension == "json") {
                files.push(path);
            }
        } else if path.is_dir() {
            files.extend(read_scenario_folder(&path)?);
        }
    }

    files.sort();

    Ok(files)
}

/// `<output>/<scenario stem>.outcome.json`
pub fn outcome_path(output: &Path, scenario: &Path) -> PathBuf {
    let stem = scenario
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("scenario"));

    output.join(format!("{stem}.outcome.json"))
}
