// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashSet;

use crate::domain::models::product::NormalizedProduct;

/// 按 handle 去重一批规范化商品
///
/// 多语言店铺会把同一商品以不同语言重复输出，handle 在各
/// 语言间保持一致，因此保留每个 handle 的首次出现，丢弃其余。
/// handle 为空的商品无法判定重复，全部保留。顺序保持不变，
/// 对已去重的输入是恒等操作。
pub fn dedupe_by_handle(products: Vec<NormalizedProduct>) -> Vec<NormalizedProduct> {
    let mut seen: HashSet<String> = HashSet::with_capacity(products.len());
    products
        .into_iter()
        .filter(|p| match &p.handle {
            Some(handle) => seen.insert(handle.clone()),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn product(hash_id: &str, handle: Option<&str>) -> NormalizedProduct {
        let mut p = NormalizedProduct::empty(Uuid::nil(), hash_id.to_string());
        p.handle = handle.map(str::to_string);
        p
    }

    #[test]
    fn keeps_first_occurrence_per_handle() {
        let out = dedupe_by_handle(vec![
            product("en-1", Some("tee")),
            product("fr-1", Some("tee")),
            product("en-2", Some("cap")),
            product("de-1", Some("tee")),
        ]);
        let ids: Vec<&str> = out.iter().map(|p| p.hash_id.as_str()).collect();
        assert_eq!(ids, ["en-1", "en-2"]);
    }

    #[test]
    fn null_handles_are_all_kept() {
        let out = dedupe_by_handle(vec![
            product("a", None),
            product("b", None),
            product("c", Some("x")),
            product("d", None),
        ]);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn idempotent_on_deduped_input() {
        let input = vec![product("a", Some("x")), product("b", Some("y"))];
        let once = dedupe_by_handle(input.clone());
        let twice = dedupe_by_handle(once.clone());
        assert_eq!(once, input);
        assert_eq!(twice, once);
    }

    #[test]
    fn empty_input_is_fine() {
        assert!(dedupe_by_handle(vec![]).is_empty());
    }
}
