//! Shared fixtures for integration tests.

#![allow(dead_code)]

use ontouml_stats::model::{Model, StereotypeCounts};
use std::fs;
use std::path::Path;

pub fn counts(pairs: &[(&str, u64)]) -> StereotypeCounts {
    let mut map: StereotypeCounts = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    map.entry("none".to_string()).or_insert(0);
    map.entry("other".to_string()).or_insert(0);
    map
}

/// Model with `classes` kinds and `relations` materials.
pub fn sized_model(name: &str, year: i32, is_classroom: bool, classes: u64, relations: u64) -> Model {
    Model::new(
        name,
        year,
        is_classroom,
        counts(&[("kind", classes)]),
        counts(&[("material", relations)]),
    )
    .unwrap()
}

/// Write a small catalog: six non-classroom models (one oversized) and
/// four classroom models.
pub fn write_catalog(dir: &Path) {
    fs::write(
        dir.join("models_data.csv"),
        "model,year,is_classroom\n\
         n1,2012,False\n\
         n2,2015,False\n\
         n3,2017,False\n\
         n4,2019,False\n\
         n5,2020-06-01,False\n\
         n6,2022,False\n\
         c1,2018,True\n\
         c2,2019,True\n\
         c3,2020,True\n\
         c4,2021,True\n",
    )
    .unwrap();
    fs::write(
        dir.join("class_stereotypes.csv"),
        "model,kind,role,phase,other\n\
         n1,6,2,1,1\n\
         n2,7,2,1,0\n\
         n3,6,3,1,0\n\
         n4,7,3,0,1\n\
         n5,120,40,10,5\n\
         n6,8,2,1,0\n\
         c1,3,1,0,0\n\
         c2,4,1,0,0\n\
         c3,3,2,0,1\n\
         c4,4,1,1,0\n",
    )
    .unwrap();
    fs::write(
        dir.join("relation_stereotypes.csv"),
        "model,material,mediation,none,other\n\
         n1,3,1,1,0\n\
         n2,3,2,1,0\n\
         n3,2,2,1,0\n\
         n4,3,2,0,0\n\
         n5,4,2,0,1\n\
         n6,3,1,1,0\n\
         c1,1,1,0,0\n\
         c2,1,0,1,0\n\
         c3,2,0,0,0\n",
    )
    .unwrap();
    fs::write(
        dir.join("model_totals.csv"),
        "model,total_class_number,total_relation_number\n\
         n1,12,5\n\
         n2,12,6\n\
         n3,12,5\n\
         n4,12,5\n\
         n5,180,7\n\
         n6,13,5\n\
         c1,5,2\n\
         c2,6,2\n\
         c3,6,2\n\
         c4,6,0\n",
    )
    .unwrap();
}
