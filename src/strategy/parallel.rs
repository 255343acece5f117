//! Parallel Batch Builds
//!
//! Uses Rayon to build many independent documents at once. Each input gets
//! its own dispatcher and builder; nothing is shared between builds except
//! the read-only options.

use rayon::prelude::*;

use crate::config::ParseOptions;
use crate::dom::Document;
use crate::error::Result;
use crate::sax::build;

/// Build every input in parallel, results in input order
pub fn build_many<B>(inputs: &[B], options: &ParseOptions) -> Vec<Result<Document>>
where
    B: AsRef<[u8]> + Sync,
{
    log::debug!("building {} documents in parallel", inputs.len());
    inputs
        .par_iter()
        .map(|input| build(input.as_ref(), options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_many_keeps_order() {
        let inputs = ["<a/>", "<b><c>1</c></b>", "<d x='1'/>"];
        let results = build_many(&inputs, &ParseOptions::default());
        let names: Vec<_> = results
            .iter()
            .map(|r| r.as_ref().unwrap().root().name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_build_many_isolates_failures() {
        let inputs: Vec<Vec<u8>> = vec![b"<ok/>".to_vec(), b"<bad>".to_vec(), b"<ok/>".to_vec()];
        let results = build_many(&inputs, &ParseOptions::default());
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().kind(), "parse");
        assert!(results[2].is_ok());
    }
}
