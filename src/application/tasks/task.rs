use async_trait::async_trait;

use crate::common::errors::RecycleBinError;

/// Estado de una tarea. Una tarea que falla se queda en `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    New,
    Running,
    Ok,
}

/// Unidad de trabajo ejecutada dentro de la transacción `H` del host.
///
/// Cada tarea recibe su entrada tipada en `run` y devuelve una salida que
/// puede alimentar a la siguiente tarea de una [`Sequence`]. Los hooks
/// `pre_hook`/`post_hook` son opcionales y sólo los invoca [`execute`].
#[async_trait]
pub trait Task<H: Send + 'static>: Send {
    type Input: Send + Sync;
    type Output: Send + Sync;

    fn name(&self) -> &str;

    fn status(&self) -> TaskStatus;

    async fn run(&mut self, input: Self::Input, handle: &mut H) -> Result<Self::Output, RecycleBinError>;

    async fn pre_hook(&mut self, _input: &Self::Input, _handle: &mut H) -> Result<(), RecycleBinError> {
        Ok(())
    }

    async fn post_hook(&mut self, _output: &Self::Output, _handle: &mut H) -> Result<(), RecycleBinError> {
        Ok(())
    }
}

/// Ejecuta una tarea con sus hooks: pre-hook, run y post-hook
pub async fn execute<H, T>(task: &mut T, input: T::Input, handle: &mut H) -> Result<T::Output, RecycleBinError>
where
    H: Send + 'static,
    T: Task<H> + ?Sized,
{
    task.pre_hook(&input, handle).await?;
    let output = task.run(input, handle).await?;
    task.post_hook(&output, handle).await?;
    Ok(output)
}

/// Dos tareas encadenadas: la salida de `first` es la entrada de `second`.
/// Si `first` falla, `second` no llega a ejecutarse.
pub struct Sequence<A, B> {
    first: A,
    second: B,
    name: Option<String>,
    status: TaskStatus,
}

impl<A, B> Sequence<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            name: None,
            status: TaskStatus::New,
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }
}

#[async_trait]
impl<H, A, B> Task<H> for Sequence<A, B>
where
    H: Send + 'static,
    A: Task<H>,
    B: Task<H, Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn name(&self) -> &str {
        // sin nombre propio, la secuencia se identifica por su último paso
        match &self.name {
            Some(name) => name.as_str(),
            None => self.second.name(),
        }
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    async fn run(&mut self, input: A::Input, handle: &mut H) -> Result<B::Output, RecycleBinError> {
        self.status = TaskStatus::Running;

        let intermediate = execute(&mut self.first, input, handle).await?;
        let output = execute(&mut self.second, intermediate, handle).await?;

        self.status = TaskStatus::Ok;
        Ok(output)
    }
}

/// `a.then(b)` construye `Sequence<A, B>`
pub trait TaskSequenceExt: Sized {
    fn then<B>(self, next: B) -> Sequence<Self, B> {
        Sequence::new(self, next)
    }
}

impl<T> TaskSequenceExt for T {}
