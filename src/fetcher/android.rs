//! SharedPreferences walk over the JNI bridge
//!
//! Android players persist PlayerPrefs in a SharedPreferences store named
//! `{bundle_id}.v2.playerprefs`. Keys (and string values) were
//! percent-encoded at write time to survive arbitrary characters, so both
//! are unescaped on the way out. The boxed type of each entry decides which
//! typed accessor to call; anything unrecognized falls back to `toString`.
//!
//! Every JNI local reference lives inside a frame and is released when the
//! walk finishes.

use super::FetchError;
use crate::value::{PrefValue, PrefsMap};
use jni::objects::{JObject, JString, JValue};
use jni::JNIEnv;
use percent_encoding::percent_decode_str;
use tracing::warn;

pub fn fetch_shared_prefs(prefs_name: &str) -> Result<PrefsMap, FetchError> {
    let ctx = ndk_context::android_context();
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| FetchError::Bridge(format!("no JavaVM: {e}")))?;
    let activity = unsafe { JObject::from_raw(ctx.context().cast()) };

    let mut env = vm
        .attach_current_thread()
        .map_err(|e| FetchError::Bridge(format!("failed to attach thread: {e}")))?;

    walk_entries(&mut env, &activity, prefs_name)
        .map_err(|e| FetchError::Bridge(format!("JNI call failed: {e}")))
}

fn walk_entries(
    env: &mut JNIEnv<'_>,
    activity: &JObject<'_>,
    prefs_name: &str,
) -> jni::errors::Result<PrefsMap> {
    let mut prefs = PrefsMap::new();

    let name = env.new_string(prefs_name)?;
    let store = env
        .call_method(
            activity,
            "getSharedPreferences",
            "(Ljava/lang/String;I)Landroid/content/SharedPreferences;",
            &[JValue::Object(&name), JValue::Int(0)],
        )?
        .l()?;

    let all = env
        .call_method(&store, "getAll", "()Ljava/util/Map;", &[])?
        .l()?;
    let entry_set = env
        .call_method(&all, "entrySet", "()Ljava/util/Set;", &[])?
        .l()?;
    let iter = env
        .call_method(&entry_set, "iterator", "()Ljava/util/Iterator;", &[])?
        .l()?;

    while env.call_method(&iter, "hasNext", "()Z", &[])?.z()? {
        env.with_local_frame(16, |env| -> jni::errors::Result<()> {
            let entry = env
                .call_method(&iter, "next", "()Ljava/lang/Object;", &[])?
                .l()?;

            let key_obj = env
                .call_method(&entry, "getKey", "()Ljava/lang/Object;", &[])?
                .l()?;
            let key = jstring_to_string(env, &key_obj.into())?;
            if key.is_empty() {
                return Ok(());
            }
            let display_key = percent_unescape(&key);

            let value_obj = env
                .call_method(&entry, "getValue", "()Ljava/lang/Object;", &[])?
                .l()?;
            if value_obj.is_null() {
                prefs.insert(display_key, PrefValue::Null);
                return Ok(());
            }

            let class = env
                .call_method(&value_obj, "getClass", "()Ljava/lang/Class;", &[])?
                .l()?;
            let simple_name_obj = env
                .call_method(&class, "getSimpleName", "()Ljava/lang/String;", &[])?
                .l()?;
            let simple_name = jstring_to_string(env, &simple_name_obj.into())?;

            let key_arg = env.new_string(&key)?;
            let value = match simple_name.as_str() {
                "Integer" => {
                    let v = env
                        .call_method(
                            &store,
                            "getInt",
                            "(Ljava/lang/String;I)I",
                            &[JValue::Object(&key_arg), JValue::Int(0)],
                        )?
                        .i()?;
                    PrefValue::I32(v)
                }
                "Float" => {
                    let v = env
                        .call_method(
                            &store,
                            "getFloat",
                            "(Ljava/lang/String;F)F",
                            &[JValue::Object(&key_arg), JValue::Float(0.0)],
                        )?
                        .f()?;
                    PrefValue::F32(v)
                }
                "String" => {
                    let default = env.new_string("")?;
                    let v = env
                        .call_method(
                            &store,
                            "getString",
                            "(Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;",
                            &[JValue::Object(&key_arg), JValue::Object(&default)],
                        )?
                        .l()?;
                    PrefValue::Str(percent_unescape(&jstring_to_string(env, &v.into())?))
                }
                other => {
                    warn!(key = %display_key, kind = other, "unsupported boxed type, using toString");
                    let v = env
                        .call_method(&value_obj, "toString", "()Ljava/lang/String;", &[])?
                        .l()?;
                    PrefValue::Str(percent_unescape(&jstring_to_string(env, &v.into())?))
                }
            };

            prefs.insert(display_key, value);
            Ok(())
        })?;
    }

    Ok(prefs)
}

fn jstring_to_string(env: &mut JNIEnv<'_>, s: &JString<'_>) -> jni::errors::Result<String> {
    Ok(env.get_string(s)?.into())
}

fn percent_unescape(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
