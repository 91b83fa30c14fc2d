// Copyright 2025 Stratus Cloud Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Optimistic-concurrency preconditions for storage requests.
//!
//! The service maintains two version counters per blob: the `generation`
//! (incremented when the data changes) and the `metageneration` (incremented
//! when the metadata changes). Requests can carry preconditions on either
//! counter; a request whose precondition does not hold fails with
//! [FAILED_PRECONDITION][gax::error::rpc::Code::FailedPrecondition].
//!
//! Each request context has its own option type, so an option built for one
//! context cannot leak into another. The value-free [MatchRule] variants are
//! used by the [Blob][crate::Blob] handle: the concrete counter values are
//! read from the handle's current snapshot at call time.

use crate::model::BlobInfo;

macro_rules! precondition_option {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        #[non_exhaustive]
        pub enum $name {
            /// The request fails unless the live generation equals the given
            /// value.
            GenerationMatch(i64),
            /// The request fails if the live generation equals the given
            /// value.
            GenerationNotMatch(i64),
            /// The request fails unless the live metageneration equals the
            /// given value.
            MetagenerationMatch(i64),
            /// The request fails if the live metageneration equals the given
            /// value.
            MetagenerationNotMatch(i64),
        }

        impl $name {
            /// The query parameter encoding this option on the wire.
            pub fn query_parameter(&self) -> (&'static str, String) {
                match self {
                    Self::GenerationMatch(v) => ("ifGenerationMatch", v.to_string()),
                    Self::GenerationNotMatch(v) => ("ifGenerationNotMatch", v.to_string()),
                    Self::MetagenerationMatch(v) => ("ifMetagenerationMatch", v.to_string()),
                    Self::MetagenerationNotMatch(v) => ("ifMetagenerationNotMatch", v.to_string()),
                }
            }
        }
    };
}

precondition_option!(GetOption, "A precondition for read (`get`) requests.");
precondition_option!(
    SourceOption,
    "A precondition on the source of a `delete` or `copy` request."
);
precondition_option!(TargetOption, "A precondition for `update` requests.");

/// A precondition intent without a concrete counter value.
///
/// Handle methods accept these and resolve them against the handle's current
/// snapshot, converting to the option type of the target context. For
/// example, `blob.delete(&[MatchRule::GenerationMatch])` deletes the blob
/// only if it has not been overwritten since the handle was created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum MatchRule {
    /// The operation fails if the blob's data changed since the snapshot was
    /// taken.
    GenerationMatch,
    /// The operation fails unless the blob's data changed since the snapshot
    /// was taken.
    GenerationNotMatch,
    /// The operation fails if the blob's metadata changed since the snapshot
    /// was taken.
    MetagenerationMatch,
    /// The operation fails unless the blob's metadata changed since the
    /// snapshot was taken.
    MetagenerationNotMatch,
}

impl MatchRule {
    /// Converts the intent to a read precondition against `info`.
    pub fn to_get_option(self, info: &BlobInfo) -> GetOption {
        match self {
            Self::GenerationMatch => GetOption::GenerationMatch(info.generation),
            Self::GenerationNotMatch => GetOption::GenerationNotMatch(info.generation),
            Self::MetagenerationMatch => GetOption::MetagenerationMatch(info.metageneration),
            Self::MetagenerationNotMatch => GetOption::MetagenerationNotMatch(info.metageneration),
        }
    }

    /// Converts the intent to a delete/copy-source precondition against
    /// `info`.
    pub fn to_source_option(self, info: &BlobInfo) -> SourceOption {
        match self {
            Self::GenerationMatch => SourceOption::GenerationMatch(info.generation),
            Self::GenerationNotMatch => SourceOption::GenerationNotMatch(info.generation),
            Self::MetagenerationMatch => SourceOption::MetagenerationMatch(info.metageneration),
            Self::MetagenerationNotMatch => {
                SourceOption::MetagenerationNotMatch(info.metageneration)
            }
        }
    }

    /// Converts the intent to an update precondition against `info`.
    pub fn to_target_option(self, info: &BlobInfo) -> TargetOption {
        match self {
            Self::GenerationMatch => TargetOption::GenerationMatch(info.generation),
            Self::GenerationNotMatch => TargetOption::GenerationNotMatch(info.generation),
            Self::MetagenerationMatch => TargetOption::MetagenerationMatch(info.metageneration),
            Self::MetagenerationNotMatch => {
                TargetOption::MetagenerationNotMatch(info.metageneration)
            }
        }
    }
}

/// Converts a sequence of intents to read preconditions against `info`.
pub fn to_get_options(info: &BlobInfo, rules: &[MatchRule]) -> Vec<GetOption> {
    rules.iter().map(|r| r.to_get_option(info)).collect()
}

/// Converts a sequence of intents to delete/copy-source preconditions
/// against `info`.
pub fn to_source_options(info: &BlobInfo, rules: &[MatchRule]) -> Vec<SourceOption> {
    rules.iter().map(|r| r.to_source_option(info)).collect()
}

/// Converts a sequence of intents to update preconditions against `info`.
pub fn to_target_options(info: &BlobInfo, rules: &[MatchRule]) -> Vec<TargetOption> {
    rules.iter().map(|r| r.to_target_option(info)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn info() -> BlobInfo {
        BlobInfo::new()
            .set_bucket("b")
            .set_name("n")
            .set_generation(42)
            .set_metageneration(7)
    }

    #[test_case(MatchRule::GenerationMatch, GetOption::GenerationMatch(42))]
    #[test_case(MatchRule::GenerationNotMatch, GetOption::GenerationNotMatch(42))]
    #[test_case(MatchRule::MetagenerationMatch, GetOption::MetagenerationMatch(7))]
    #[test_case(MatchRule::MetagenerationNotMatch, GetOption::MetagenerationNotMatch(7))]
    fn get_conversion(rule: MatchRule, want: GetOption) {
        assert_eq!(rule.to_get_option(&info()), want);
    }

    #[test]
    fn source_and_target_conversion() {
        let info = info();
        assert_eq!(
            MatchRule::GenerationMatch.to_source_option(&info),
            SourceOption::GenerationMatch(42)
        );
        assert_eq!(
            MatchRule::MetagenerationNotMatch.to_target_option(&info),
            TargetOption::MetagenerationNotMatch(7)
        );
    }

    #[test]
    fn conversion_preserves_order() {
        let rules = [MatchRule::MetagenerationMatch, MatchRule::GenerationMatch];
        let got = to_get_options(&info(), &rules);
        assert_eq!(
            got,
            vec![
                GetOption::MetagenerationMatch(7),
                GetOption::GenerationMatch(42),
            ]
        );
    }

    #[test_case(GetOption::GenerationMatch(1), ("ifGenerationMatch", "1"))]
    #[test_case(GetOption::GenerationNotMatch(2), ("ifGenerationNotMatch", "2"))]
    #[test_case(GetOption::MetagenerationMatch(3), ("ifMetagenerationMatch", "3"))]
    #[test_case(GetOption::MetagenerationNotMatch(4), ("ifMetagenerationNotMatch", "4"))]
    fn query_parameters(option: GetOption, want: (&str, &str)) {
        let (name, value) = option.query_parameter();
        assert_eq!((name, value.as_str()), want);
    }
}
