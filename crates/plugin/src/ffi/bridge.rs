//! JNI implementation of the platform bridge

use std::collections::HashMap;
use std::path::PathBuf;

use jni::objects::{GlobalRef, JMethodID, JObject, JString, JValueOwned};
use jni::signature::{Primitive, ReturnType};
use jni::sys::jvalue;
use jni::{JNIEnv, JavaVM};

use tunnel_platform::{BridgeError, MotionRange, PlatformBridge, ServiceRequest};
use tunnel_sdk::entrypoints::{self, Entrypoint, ENTRYPOINTS};

/// Argument passed to an activity method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    Int(i32),
    Long(i64),
    Str(&'a str),
}

impl Arg<'_> {
    /// JNI signature fragment for this argument
    pub fn signature(&self) -> &'static str {
        match self {
            Self::Int(_) => "I",
            Self::Long(_) => "J",
            Self::Str(_) => "Ljava/lang/String;",
        }
    }
}

/// Arguments for a request, in the order its entrypoint declares them
pub fn request_args(request: &ServiceRequest) -> Vec<Arg<'_>> {
    match request {
        ServiceRequest::StartSignIn
        | ServiceRequest::StartSignOut
        | ServiceRequest::ShowAchievements
        | ServiceRequest::ShowLeaderboards => Vec::new(),
        ServiceRequest::ShowLeaderboard { id } | ServiceRequest::UnlockAchievement { id } => {
            vec![Arg::Str(id)]
        }
        ServiceRequest::IncrementAchievement { id, steps } => vec![Arg::Str(id), Arg::Int(*steps)],
        ServiceRequest::SubmitScore { board, score } => vec![Arg::Str(board), Arg::Long(*score)],
        ServiceRequest::ShowEncouragementToasts { score }
        | ServiceRequest::ResetEncouragementToasts { score } => vec![Arg::Int(*score)],
        ServiceRequest::SaveState { level } => vec![Arg::Int(*level)],
    }
}

/// [`PlatformBridge`] that calls methods on the host activity
///
/// Every entrypoint is resolved when the bridge is created, so a host that
/// lacks one fails at startup instead of on first use.
pub struct JniBridge {
    vm: JavaVM,
    activity: GlobalRef,
    methods: HashMap<&'static str, JMethodID>,
}

impl JniBridge {
    /// Resolve every entrypoint against the activity's class
    ///
    /// # Arguments
    /// * `env` - Environment of the calling (UI) thread
    /// * `activity` - The host activity instance
    ///
    /// # Errors
    /// [`BridgeError::MissingEntrypoint`] for the first method the class lacks
    #[tracing::instrument(skip_all)]
    pub fn new(env: &mut JNIEnv<'_>, activity: &JObject<'_>) -> Result<Self, BridgeError> {
        let vm = env
            .get_java_vm()
            .map_err(|e| BridgeError::NotAttached(e.to_string()))?;
        let activity_ref = env
            .new_global_ref(activity)
            .map_err(|e| call_failed("NewGlobalRef", e))?;
        let class = env
            .get_object_class(activity)
            .map_err(|e| call_failed("GetObjectClass", e))?;

        let mut methods = HashMap::with_capacity(ENTRYPOINTS.len());
        for entrypoint in ENTRYPOINTS {
            match env.get_method_id(&class, entrypoint.name, entrypoint.signature) {
                Ok(id) => {
                    methods.insert(entrypoint.name, id);
                }
                Err(_) => {
                    clear_exception(env);
                    return Err(missing(*entrypoint));
                }
            }
        }

        tracing::info!("Resolved {} host entrypoints", methods.len());
        Ok(Self {
            vm,
            activity: activity_ref,
            methods,
        })
    }

    fn method(&self, entrypoint: Entrypoint) -> Result<JMethodID, BridgeError> {
        self.methods
            .get(entrypoint.name)
            .copied()
            .ok_or_else(|| missing(entrypoint))
    }

    /// Call an activity method on the current thread
    ///
    /// The thread is attached permanently on first use. Local references
    /// created for arguments are released before returning.
    fn invoke<T>(
        &self,
        entrypoint: Entrypoint,
        ret: ReturnType,
        args: &[Arg<'_>],
        convert: impl FnOnce(&mut JNIEnv<'_>, JValueOwned<'_>) -> jni::errors::Result<T>,
    ) -> Result<T, BridgeError> {
        let method = self.method(entrypoint)?;
        let mut env = self
            .vm
            .attach_current_thread_permanently()
            .map_err(|e| BridgeError::NotAttached(e.to_string()))?;

        let result = env.with_local_frame(8, |env| -> jni::errors::Result<T> {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(match *arg {
                    Arg::Int(i) => jvalue { i },
                    Arg::Long(j) => jvalue { j },
                    Arg::Str(s) => jvalue {
                        l: JObject::from(env.new_string(s)?).into_raw(),
                    },
                });
            }

            // SAFETY: `method` was resolved on the activity's class with the
            // signature that `ret` and `args` follow
            let value =
                unsafe { env.call_method_unchecked(&self.activity, method, ret, &values) }?;
            convert(env, value)
        });

        result.map_err(|e| {
            clear_exception(&mut env);
            call_failed(entrypoint.name, e)
        })
    }

    fn call_float(&self, entrypoint: Entrypoint, args: &[Arg<'_>]) -> Result<f32, BridgeError> {
        self.invoke(
            entrypoint,
            ReturnType::Primitive(Primitive::Float),
            args,
            |_, v| v.f(),
        )
    }
}

impl PlatformBridge for JniBridge {
    fn post(&self, request: &ServiceRequest) -> Result<(), BridgeError> {
        self.invoke(
            request.entrypoint(),
            ReturnType::Primitive(Primitive::Void),
            &request_args(request),
            |_, v| v.v(),
        )
    }

    fn api_level(&self) -> Result<i32, BridgeError> {
        self.invoke(
            entrypoints::GET_API_LEVEL,
            ReturnType::Primitive(Primitive::Int),
            &[],
            |_, v| v.i(),
        )
    }

    fn files_dir(&self) -> Result<PathBuf, BridgeError> {
        let path = self.invoke(
            entrypoints::GET_SAVE_PATH,
            ReturnType::Object,
            &[],
            |env, v| {
                let obj = v.l()?;
                if obj.is_null() {
                    return Ok(None);
                }
                let path: String = env.get_string(&JString::from(obj))?.into();
                Ok(Some(path))
            },
        )?;

        path.map(PathBuf::from).ok_or(BridgeError::CallFailed {
            name: entrypoints::GET_SAVE_PATH.name,
            reason: "host returned null".into(),
        })
    }

    fn device_motion_range(
        &self,
        device_id: i32,
        source: i32,
    ) -> Result<MotionRange, BridgeError> {
        let args = [Arg::Int(device_id), Arg::Int(source)];
        Ok(MotionRange::new(
            self.call_float(entrypoints::GET_MOTION_RANGE_MIN_X, &args)?,
            self.call_float(entrypoints::GET_MOTION_RANGE_MAX_X, &args)?,
            self.call_float(entrypoints::GET_MOTION_RANGE_MIN_Y, &args)?,
            self.call_float(entrypoints::GET_MOTION_RANGE_MAX_Y, &args)?,
        ))
    }
}

fn missing(entrypoint: Entrypoint) -> BridgeError {
    BridgeError::MissingEntrypoint {
        name: entrypoint.name,
        signature: entrypoint.signature,
    }
}

fn call_failed(name: &'static str, e: jni::errors::Error) -> BridgeError {
    BridgeError::CallFailed {
        name,
        reason: e.to_string(),
    }
}

/// Log and clear a pending Java exception so the thread can keep calling
fn clear_exception(env: &mut JNIEnv<'_>) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Argument list of a JNI method signature, e.g. `(Ljava/lang/String;J)V`
    fn declared_args(signature: &str) -> Vec<String> {
        let inner = &signature[1..signature.find(')').unwrap()];
        let mut args = Vec::new();
        let mut rest = inner;
        while !rest.is_empty() {
            if rest.starts_with('L') {
                let end = rest.find(';').unwrap() + 1;
                args.push(rest[..end].to_string());
                rest = &rest[end..];
            } else {
                args.push(rest[..1].to_string());
                rest = &rest[1..];
            }
        }
        args
    }

    #[test]
    fn test_declared_args() {
        assert!(declared_args("()V").is_empty());
        assert_eq!(declared_args("(II)F"), vec!["I", "I"]);
        assert_eq!(
            declared_args("(Ljava/lang/String;J)V"),
            vec!["Ljava/lang/String;", "J"]
        );
    }

    #[test]
    fn test_request_args_match_signatures() {
        let requests = [
            ServiceRequest::StartSignIn,
            ServiceRequest::StartSignOut,
            ServiceRequest::ShowAchievements,
            ServiceRequest::ShowLeaderboards,
            ServiceRequest::ShowLeaderboard { id: "lb".into() },
            ServiceRequest::UnlockAchievement { id: "ach".into() },
            ServiceRequest::IncrementAchievement {
                id: "ach".into(),
                steps: 2,
            },
            ServiceRequest::SubmitScore {
                board: "lb".into(),
                score: 1_000,
            },
            ServiceRequest::ShowEncouragementToasts { score: 10 },
            ServiceRequest::ResetEncouragementToasts { score: 0 },
            ServiceRequest::SaveState { level: 4 },
        ];

        for request in &requests {
            let entrypoint = request.entrypoint();
            let passed: Vec<&str> = request_args(request).iter().map(Arg::signature).collect();
            assert_eq!(
                passed,
                declared_args(entrypoint.signature),
                "{}",
                entrypoint.name
            );
            assert!(entrypoint.signature.ends_with(")V"), "{}", entrypoint.name);
        }
    }

    #[test]
    fn test_query_signatures() {
        assert_eq!(
            declared_args(entrypoints::GET_MOTION_RANGE_MAX_Y.signature),
            vec!["I", "I"]
        );
        assert!(declared_args(entrypoints::GET_API_LEVEL.signature).is_empty());
        assert!(entrypoints::GET_SAVE_PATH.signature.ends_with("Ljava/lang/String;"));
    }

    #[test]
    fn test_string_argument_borrows_request() {
        let request = ServiceRequest::SubmitScore {
            board: "board".into(),
            score: -1,
        };
        assert_eq!(
            request_args(&request),
            vec![Arg::Str("board"), Arg::Long(-1)]
        );
    }
}
