// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use corpus_helpers::collection::{Collection, Outcome};
use corpus_helpers::CorpusError;
use pretty_assertions::assert_eq;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn written(outcome: Outcome) -> Vec<PathBuf> {
    match outcome {
        Outcome::Written(files) => files,
        Outcome::UpToDate => panic!("expected files to be written"),
    }
}

fn banner(group: &str) -> String {
    format!("~~~~~~~~~~~~~~~\nText File : {group}\n~~~~~~~~~~~~~~~\n")
}

#[test]
fn test_go_pipeline() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let repo = tmp_dir.path().join("holoholo-text");
    let out = tmp_dir.path().join("corpus/GO");
    write(
        &repo.join("Release/en-us/en-us_raw.json"),
        r#"{"data": ["b_key", "B", "a_key", "A\nline"]}"#,
    );
    write(
        &repo.join("Release/ja/ja_raw.json"),
        r#"{"data": ["a_key", "エー"]}"#,
    );
    write(
        &repo.join("Remote/en-us/en-us_raw.json"),
        r#"{"data": ["c_key", "C", "b_key", "B2"]}"#,
    );

    let files = written(Collection::go().build(&repo, &out, false).unwrap());

    assert_eq!(
        files,
        vec![
            out.join("qid_text.txt"),
            out.join("en_text.txt"),
            out.join("ja_text.txt"),
        ]
    );
    assert_eq!(read(&files[0]), "go.a_key\ngo.b_key\ngo.c_key\n");
    assert_eq!(read(&files[1]), "A\\nline\nB2\nC\n");
    assert_eq!(read(&files[2]), "エー\n[NULL]\n[NULL]\n");
}

#[test]
fn test_go_keys_stay_on_one_line() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let repo = tmp_dir.path().join("holoholo-text");
    let out = tmp_dir.path().join("corpus/GO");
    write(
        &repo.join("Release/en-us/en-us_raw.json"),
        r#"{"data": ["a\nb", "One", "c\\d", "Two"]}"#,
    );

    let files = written(Collection::go().build(&repo, &out, false).unwrap());

    let ids = read(&files[0]);
    let texts = read(&files[1]);
    assert_eq!(ids, "go.a\\nb\ngo.c\\\\d\n");
    assert_eq!(texts, "One\nTwo\n");
    assert_eq!(ids.lines().count(), texts.lines().count());
}

#[test]
fn test_masters_keys_merge_across_languages() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let repo = tmp_dir.path().join("masters-text");
    let out = tmp_dir.path().join("corpus/Masters");
    write(
        &repo.join("Messages/menu_en.json"),
        r#"{"menu/title": "Title"}"#,
    );
    write(&repo.join("Messages/menu_ja.json"), r#"{"title": "タイトル"}"#);

    let files = written(Collection::masters().build(&repo, &out, false).unwrap());

    let menu = banner("menu");
    assert_eq!(read(&files[0]), format!("{menu}masters.menu.title\n"));
    assert_eq!(read(&files[1]), format!("{menu}Title\n"));
    assert_eq!(read(&files[2]), format!("{menu}タイトル\n"));
}

#[test]
fn test_freshness_gate() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let repo = tmp_dir.path().join("holoholo-text");
    let out = tmp_dir.path().join("corpus/GO");
    let dump = repo.join("Release/en-us/en-us_raw.json");
    write(&dump, r#"{"data": ["k", "v"]}"#);
    File::options()
        .write(true)
        .open(&dump)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(60))
        .unwrap();

    let collection = Collection::go();
    written(collection.build(&repo, &out, false).unwrap());
    assert_eq!(
        collection.build(&repo, &out, false).unwrap(),
        Outcome::UpToDate
    );
    written(collection.build(&repo, &out, true).unwrap());

    write(&dump, r#"{"data": ["k", "changed"]}"#);
    File::options()
        .write(true)
        .open(&dump)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();
    written(collection.build(&repo, &out, false).unwrap());
    assert_eq!(read(&out.join("en_text.txt")), "changed\n");
}

#[test]
fn test_home_pipeline() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let repo = tmp_dir.path().join("megaturtle-text");
    let out = tmp_dir.path().join("corpus/HOME");
    write(
        &repo.join("sp/msbt_usa_lf.txt"),
        "Text File : monsname_usa.msbt\n\
         A\tBulbasaur\n\
         B\tGot\\n[VAR 1101(0000,0101)]\\na\\nb\n\
         Text File : empty_usa.msbt\n",
    );
    write(
        &repo.join("msbt_jpn_lf.txt"),
        "Text File : monsname_jpn.msbt\nA\tフシギダネ\nC\tシー\n",
    );

    let files = written(Collection::home().build(&repo, &out, false).unwrap());

    assert_eq!(
        files,
        vec![
            out.join("qid_megaturtle_sp.txt"),
            out.join("ja-Hrkt_megaturtle_sp.txt"),
            out.join("en_megaturtle_sp.txt"),
        ]
    );
    let banners = format!("{}{}", banner("empty"), banner("monsname"));
    assert_eq!(
        read(&files[0]),
        format!("{banners}home.sp.monsname.A\nhome.sp.monsname.C\nhome.sp.monsname.B\n")
    );
    assert_eq!(
        read(&files[1]),
        format!("{banners}フシギダネ\nシー\n[NULL]\n")
    );
    assert_eq!(
        read(&files[2]),
        format!("{banners}Bulbasaur\n[NULL]\nGot[VAR 1101(0000,0101)]ab\n")
    );
}

#[test]
fn test_home_malformed_dump_writes_nothing() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let repo = tmp_dir.path().join("megaturtle-text");
    let out = tmp_dir.path().join("corpus/HOME");
    write(&repo.join("msbt_usa_lf.txt"), "A\tno header yet\n");

    let result = Collection::home().build(&repo, &out, false);

    assert!(matches!(result, Err(CorpusError::MalformedSource { .. })));
    assert!(!out.exists());
}

#[test]
fn test_masters_pipeline() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let repo = tmp_dir.path().join("masters-text");
    let out = tmp_dir.path().join("corpus/Masters");
    write(
        &repo.join("Messages/menu_en.json"),
        r#"{"menu/title": "Title", "a.b": "Dot"}"#,
    );
    write(
        &repo.join("Messages/menu_zh-TW.json"),
        r#"{"menu/title": "標題"}"#,
    );
    write(
        &repo.join("Messages/talk/ev_en.json"),
        r#"{"line": "Hi\nthere"}"#,
    );

    let files = written(Collection::masters().build(&repo, &out, false).unwrap());

    assert_eq!(
        files,
        vec![
            out.join("qid_messages.txt"),
            out.join("en_messages.txt"),
            out.join("zh-Hant_messages.txt"),
            out.join("qid_talk.txt"),
            out.join("en_talk.txt"),
            out.join("qid_ui.txt"),
        ]
    );
    let menu = banner("menu");
    assert_eq!(
        read(&files[0]),
        format!("{menu}masters.menu.title\nmasters.menu.a^b\n")
    );
    assert_eq!(read(&files[1]), format!("{menu}Title\nDot\n"));
    assert_eq!(read(&files[2]), format!("{menu}標題\n[NULL]\n"));
    let ev = banner("ev");
    assert_eq!(read(&files[3]), format!("{ev}masters.talk.ev.line\n"));
    assert_eq!(read(&files[4]), format!("{ev}Hi\\nthere\n"));
    assert_eq!(read(&files[5]), "");
}

#[test]
fn test_masters_colliding_keys_write_nothing() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let repo = tmp_dir.path().join("masters-text");
    let out = tmp_dir.path().join("corpus/Masters");
    write(
        &repo.join("Messages/menu_en.json"),
        r#"{"menu/x": "1", "x": "2"}"#,
    );

    let result = Collection::masters().build(&repo, &out, false);

    assert!(matches!(result, Err(CorpusError::DuplicateId { .. })));
    assert!(!out.join("qid_messages.txt").exists());
}
