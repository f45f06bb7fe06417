use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use haulage_optimizer::{
    json::types::JsonPlanningInput, params::PlannerParams,
    problem::planning_problem::PlanningProblem,
};
use serde::Serialize;

/// Every file below `folder_path`, sorted.
pub fn read_folder(folder_path: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder_path)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else if path.is_dir() {
            files.extend(read_folder(&path)?);
        }
    }

    files.sort();

    Ok(files)
}

pub fn read_problem(path: &Path, params: PlannerParams) -> anyhow::Result<PlanningProblem> {
    let file = File::open(path)?;
    let input: JsonPlanningInput = serde_json::from_reader(BufReader::new(file))?;
    Ok(input.build_problem(params)?)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn test_read_folder() {
        let current_dir = env::current_dir().unwrap();
        let folder_path = current_dir.join("tests/fixtures/read_folder");
        let files = read_folder(&folder_path).unwrap();

        assert_eq!(
            files,
            vec![
                current_dir.join("tests/fixtures/read_folder/a.json"),
                current_dir.join("tests/fixtures/read_folder/nested/b.json"),
            ]
        );
    }

    #[test]
    fn test_read_problem() {
        let path = env::current_dir()
            .unwrap()
            .join("tests/fixtures/read_folder/a.json");

        let problem = read_problem(&path, PlannerParams::default()).unwrap();

        assert_eq!(problem.orders().len(), 2);
        assert_eq!(problem.trucks().len(), 1);
    }
}
